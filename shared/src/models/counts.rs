//! Inventory count models and the reconciliation rule
//!
//! Counts never overwrite the ledger projection. A count that disagrees with
//! the projection produces a correcting movement whose delta is exactly
//! (counted − projected), so the ledger stays the single authority.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical stock count submitted from a station
///
/// Multiple counts per (product, station, day) are allowed; the latest one
/// reconciles against the ledger, earlier ones are kept for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryCount {
    pub id: Uuid,
    pub product_id: Uuid,
    pub station_id: Uuid,
    pub counted_quantity: Decimal,
    pub operator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Delta the ledger must absorb for a physical count to match
///
/// The counted value is floor-clamped at zero before becoming a delta, so an
/// adjustment can never drive the projection negative. A zero delta means the
/// count confirms the projection and no movement is needed.
pub fn reconciliation_delta(counted: Decimal, projected: Decimal) -> Decimal {
    counted.max(Decimal::ZERO) - projected
}
