//! Production run models and the pure scaling/shortfall rules
//!
//! A production run is one atomic application of a recipe: it consumes
//! ingredient stock and produces output stock, or it is rejected and touches
//! nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recipe::RecipeIngredient;
use super::stock::{MovementKind, NewMovement};

/// Terminal status of a production run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Applied,
    Rejected,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Applied => "applied",
            RunStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(RunStatus::Applied),
            "rejected" => Ok(RunStatus::Rejected),
            other => Err(format!("unknown run status: {}", other)),
        }
    }
}

/// A recorded production run
///
/// `output_quantity` and `ingredients` are frozen copies of the quantities
/// in effect when the run executed; later recipe edits never change them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRun {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub multiplier: Decimal,
    pub status: RunStatus,
    pub rejection_reason: Option<String>,
    pub output_product_id: Uuid,
    /// Output actually produced (recipe output × multiplier), frozen
    pub output_quantity: Decimal,
    /// Ingredient quantities actually consumed, frozen
    pub ingredients: Vec<RunIngredient>,
    /// Per-ingredient shortfall detail when the run was rejected
    pub shortfalls: Vec<StockShortfall>,
    pub actor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Frozen ingredient line of an applied run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunIngredient {
    pub product_id: Uuid,
    /// Quantity consumed (ingredient quantity × multiplier)
    pub quantity: Decimal,
}

/// One under-supplied ingredient of a rejected run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockShortfall {
    pub product_id: Uuid,
    pub product_code: String,
    pub product_name: String,
    pub required: Decimal,
    pub available: Decimal,
    pub shortfall: Decimal,
}

/// Stock available for one ingredient at pre-check time
#[derive(Debug, Clone)]
pub struct IngredientStock {
    pub product_id: Uuid,
    pub product_code: String,
    pub product_name: String,
    pub current_stock: Decimal,
}

/// Scale recipe ingredient quantities by the run multiplier
///
/// Preserves the recipe's ingredient order.
pub fn scale_ingredients(
    ingredients: &[RecipeIngredient],
    multiplier: Decimal,
) -> Vec<RunIngredient> {
    ingredients
        .iter()
        .map(|ing| RunIngredient {
            product_id: ing.product_id,
            quantity: ing.quantity * multiplier,
        })
        .collect()
}

/// Find every ingredient whose available stock is below its requirement
///
/// Returns all shortfalls, not only the first, so a rejection names the
/// complete shopping list.
pub fn find_shortfalls(
    required: &[RunIngredient],
    available: &[IngredientStock],
) -> Vec<StockShortfall> {
    required
        .iter()
        .filter_map(|req| {
            let stock = available.iter().find(|s| s.product_id == req.product_id)?;
            if stock.current_stock < req.quantity {
                Some(StockShortfall {
                    product_id: req.product_id,
                    product_code: stock.product_code.clone(),
                    product_name: stock.product_name.clone(),
                    required: req.quantity,
                    available: stock.current_stock,
                    shortfall: req.quantity - stock.current_stock,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Human-readable reason for a rejected run, naming each short product and
/// its gap. Callers pass at least one shortfall; a rejection without one is
/// a bug upstream.
pub fn rejection_reason(shortfalls: &[StockShortfall]) -> String {
    let items: Vec<String> = shortfalls
        .iter()
        .map(|s| format!("{} ({} short)", s.product_code, s.shortfall))
        .collect();
    format!("Insufficient stock: {}", items.join(", "))
}

/// Build the all-or-nothing movement batch for an applied run:
/// one consume per ingredient plus one output movement, all keyed to the run
pub fn build_production_batch(
    run_id: Uuid,
    ingredients: &[RunIngredient],
    output_product_id: Uuid,
    output_quantity: Decimal,
) -> Vec<NewMovement> {
    let mut batch: Vec<NewMovement> = ingredients
        .iter()
        .map(|ing| {
            NewMovement::new(ing.product_id, -ing.quantity, MovementKind::ProductionConsume)
                .with_reference(run_id)
        })
        .collect();
    batch.push(
        NewMovement::new(output_product_id, output_quantity, MovementKind::ProductionOutput)
            .with_reference(run_id),
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ing(product_id: Uuid, qty: &str, position: i32) -> RecipeIngredient {
        RecipeIngredient {
            product_id,
            quantity: dec(qty),
            position,
        }
    }

    fn stock(product_id: Uuid, qty: &str) -> IngredientStock {
        IngredientStock {
            product_id,
            product_code: "X-001".to_string(),
            product_name: "Ingrediente".to_string(),
            current_stock: dec(qty),
        }
    }

    #[test]
    fn test_scale_ingredients_identity_multiplier() {
        let p = Uuid::new_v4();
        let scaled = scale_ingredients(&[ing(p, "0.5", 0)], Decimal::ONE);
        assert_eq!(scaled.len(), 1);
        assert_eq!(scaled[0].quantity, dec("0.5"));
    }

    #[test]
    fn test_scale_ingredients_fractional_multiplier() {
        let p = Uuid::new_v4();
        let scaled = scale_ingredients(&[ing(p, "2", 0)], dec("1.5"));
        assert_eq!(scaled[0].quantity, dec("3.0"));
    }

    #[test]
    fn test_scale_preserves_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let scaled = scale_ingredients(&[ing(a, "1", 0), ing(b, "2", 1)], dec("2"));
        assert_eq!(scaled[0].product_id, a);
        assert_eq!(scaled[1].product_id, b);
    }

    #[test]
    fn test_find_shortfalls_none_when_covered() {
        let p = Uuid::new_v4();
        let required = scale_ingredients(&[ing(p, "5", 0)], Decimal::ONE);
        let shortfalls = find_shortfalls(&required, &[stock(p, "5")]);
        assert!(shortfalls.is_empty());
    }

    #[test]
    fn test_find_shortfalls_reports_exact_gap() {
        let p = Uuid::new_v4();
        let required = scale_ingredients(&[ing(p, "0.5", 0)], dec("10"));
        let shortfalls = find_shortfalls(&required, &[stock(p, "4")]);
        assert_eq!(shortfalls.len(), 1);
        assert_eq!(shortfalls[0].required, dec("5.0"));
        assert_eq!(shortfalls[0].available, dec("4"));
        assert_eq!(shortfalls[0].shortfall, dec("1.0"));
    }

    #[test]
    fn test_find_shortfalls_reports_all_short_ingredients() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let required = scale_ingredients(
            &[ing(a, "10", 0), ing(b, "3", 1), ing(c, "1", 2)],
            Decimal::ONE,
        );
        let available = [stock(a, "2"), stock(b, "3"), stock(c, "0")];
        let shortfalls = find_shortfalls(&required, &available);
        assert_eq!(shortfalls.len(), 2);
        assert_eq!(shortfalls[0].product_id, a);
        assert_eq!(shortfalls[1].product_id, c);
    }

    #[test]
    fn test_build_production_batch_shape() {
        let run_id = Uuid::new_v4();
        let output = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ingredients = vec![
            RunIngredient { product_id: a, quantity: dec("2") },
            RunIngredient { product_id: b, quantity: dec("0.25") },
        ];

        let batch = build_production_batch(run_id, &ingredients, output, dec("10"));

        // N consumes + 1 output
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].delta, dec("-2"));
        assert_eq!(batch[0].kind, MovementKind::ProductionConsume);
        assert_eq!(batch[1].delta, dec("-0.25"));
        let out = &batch[2];
        assert_eq!(out.product_id, output);
        assert_eq!(out.delta, dec("10"));
        assert_eq!(out.kind, MovementKind::ProductionOutput);
        assert!(batch.iter().all(|m| m.reference_id == Some(run_id)));
    }
}
