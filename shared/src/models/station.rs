//! Kitchen station models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A kitchen station (Cocina fría, Parrilla, Barra, ...)
///
/// Stations drive the daily reporting rollup: each active station is
/// expected to submit physical counts every day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
