//! Low-stock alert evaluation
//!
//! Pure and stateless: the backend feeds it a snapshot of products, the
//! dashboard renders whatever comes back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::{Product, UnitOfMeasure};

/// One product below its configured minimum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockItem {
    pub product_id: Uuid,
    pub product_code: String,
    pub product_name: String,
    pub unit: UnitOfMeasure,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    /// current / min; lower means more urgent
    pub coverage_ratio: Decimal,
}

/// Evaluate low-stock alerts over a product snapshot
///
/// A product qualifies when `current_stock < min_stock`, strictly. Products
/// with `min_stock == 0` are not stock-monitored and never alert. The result
/// is ordered by ascending coverage ratio so the most urgent item comes
/// first.
pub fn evaluate_low_stock(products: &[Product]) -> Vec<LowStockItem> {
    let mut items: Vec<LowStockItem> = products
        .iter()
        .filter(|p| p.min_stock > Decimal::ZERO && p.current_stock < p.min_stock)
        .map(|p| LowStockItem {
            product_id: p.id,
            product_code: p.code.clone(),
            product_name: p.name.clone(),
            unit: p.unit,
            current_stock: p.current_stock,
            min_stock: p.min_stock,
            coverage_ratio: p.current_stock / p.min_stock,
        })
        .collect();
    items.sort_by(|a, b| a.coverage_ratio.cmp(&b.coverage_ratio));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(code: &str, current: &str, min: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            category_id: Uuid::new_v4(),
            unit: UnitOfMeasure::Kg,
            min_stock: dec(min),
            current_stock: dec(current),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_strictly_below_minimum_alerts() {
        let items = evaluate_low_stock(&[product("A", "2", "10")]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].coverage_ratio, dec("0.2"));
    }

    #[test]
    fn test_equal_to_minimum_does_not_alert() {
        let items = evaluate_low_stock(&[product("A", "10", "10")]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_unmonitored_product_never_alerts() {
        // min_stock 0 means untracked, even at zero stock
        let items = evaluate_low_stock(&[product("A", "0", "0")]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_ordering_by_ascending_coverage() {
        let products = vec![
            product("B", "8", "10"),
            product("A", "2", "10"),
            product("C", "0", "0"),
        ];
        let items = evaluate_low_stock(&products);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_code, "A");
        assert_eq!(items[1].product_code, "B");
    }

    #[test]
    fn test_zero_stock_monitored_product_is_most_urgent() {
        let products = vec![product("A", "1", "4"), product("B", "0", "5")];
        let items = evaluate_low_stock(&products);
        assert_eq!(items[0].product_code, "B");
        assert_eq!(items[0].coverage_ratio, Decimal::ZERO);
    }
}
