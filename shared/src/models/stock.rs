//! Stock ledger models
//!
//! The ledger is the source of truth for every product's quantity: an
//! append-only log of signed movements. The `current_stock` column on
//! products is only a cached projection of this log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single signed quantity change recorded against one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Signed delta applied to the product's projection
    pub delta: Decimal,
    pub kind: MovementKind,
    /// Originating production run or inventory count, when applicable
    pub reference_id: Option<Uuid>,
    pub actor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Kinds of stock movements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Ingredient consumed by a production run
    ProductionConsume,
    /// Output produced by a production run
    ProductionOutput,
    /// Correction emitted when a physical count disagrees with the projection
    CountAdjustment,
    /// Manual correction entered by a supervisor
    ManualAdjustment,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::ProductionConsume => "production_consume",
            MovementKind::ProductionOutput => "production_output",
            MovementKind::CountAdjustment => "count_adjustment",
            MovementKind::ManualAdjustment => "manual_adjustment",
        }
    }

    /// Count adjustments move the projection to a counted value and may
    /// therefore pass through any non-negative target; every other kind must
    /// respect the running non-negative constraint delta by delta.
    pub fn is_count_adjustment(&self) -> bool {
        matches!(self, MovementKind::CountAdjustment)
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production_consume" => Ok(MovementKind::ProductionConsume),
            "production_output" => Ok(MovementKind::ProductionOutput),
            "count_adjustment" => Ok(MovementKind::CountAdjustment),
            "manual_adjustment" => Ok(MovementKind::ManualAdjustment),
            other => Err(format!("unknown movement kind: {}", other)),
        }
    }
}

/// A movement to be appended to the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMovement {
    pub product_id: Uuid,
    pub delta: Decimal,
    pub kind: MovementKind,
    pub reference_id: Option<Uuid>,
}

impl NewMovement {
    pub fn new(product_id: Uuid, delta: Decimal, kind: MovementKind) -> Self {
        Self {
            product_id,
            delta,
            kind,
            reference_id: None,
        }
    }

    pub fn with_reference(mut self, reference_id: Uuid) -> Self {
        self.reference_id = Some(reference_id);
        self
    }
}
