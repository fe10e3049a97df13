//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product tracked by the inventory system
///
/// `current_stock` is the cached ledger projection: it always equals the sum
/// of the product's stock movement deltas and is only mutated through the
/// ledger write path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    /// Unique human-readable code (kitchen master list, e.g. "PES-001")
    pub code: String,
    pub name: String,
    pub category_id: Uuid,
    pub unit: UnitOfMeasure,
    /// Alert threshold; zero means the product is not stock-monitored
    pub min_stock: Decimal,
    /// Cached projection of the stock ledger, never negative
    pub current_stock: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product category (Pescados, Abarrotes, Verduras, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Units of measure from the kitchen master inventory list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Kg,
    Gr,
    Lt,
    Ml,
    Un,
    Porciones,
    Bandejas,
    Cajas,
    Paquetes,
}

impl UnitOfMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Kg => "kg",
            UnitOfMeasure::Gr => "gr",
            UnitOfMeasure::Lt => "lt",
            UnitOfMeasure::Ml => "ml",
            UnitOfMeasure::Un => "un",
            UnitOfMeasure::Porciones => "porciones",
            UnitOfMeasure::Bandejas => "bandejas",
            UnitOfMeasure::Cajas => "cajas",
            UnitOfMeasure::Paquetes => "paquetes",
        }
    }
}

impl std::str::FromStr for UnitOfMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(UnitOfMeasure::Kg),
            "gr" => Ok(UnitOfMeasure::Gr),
            "lt" => Ok(UnitOfMeasure::Lt),
            "ml" => Ok(UnitOfMeasure::Ml),
            "un" => Ok(UnitOfMeasure::Un),
            "porciones" => Ok(UnitOfMeasure::Porciones),
            "bandejas" => Ok(UnitOfMeasure::Bandejas),
            "cajas" => Ok(UnitOfMeasure::Cajas),
            "paquetes" => Ok(UnitOfMeasure::Paquetes),
            other => Err(format!("unknown unit of measure: {}", other)),
        }
    }
}
