//! Low-stock alert tests
//!
//! Tests for the replenishment alert rules: strict threshold comparison,
//! zero-threshold opt-out and most-critical-first ordering.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{evaluate_low_stock, Product, UnitOfMeasure};

// Helper to create Decimal from string
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

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Alerts trigger strictly below the threshold
    #[test]
    fn test_strictly_below_threshold_triggers() {
        let items = evaluate_low_stock(&[product("A-001", "9.99", "10")]);
        assert_eq!(items.len(), 1);
    }

    /// Stock exactly at the threshold does not trigger
    #[test]
    fn test_at_threshold_does_not_trigger() {
        let items = evaluate_low_stock(&[product("A-001", "10", "10")]);
        assert!(items.is_empty());
    }

    /// A zero threshold opts the product out of alerting entirely
    #[test]
    fn test_zero_threshold_opts_out() {
        let items = evaluate_low_stock(&[product("A-001", "0", "0")]);
        assert!(items.is_empty());
    }

    /// Most critical first: lowest coverage ratio leads the list
    #[test]
    fn test_ordering_most_critical_first() {
        let products = [
            product("MED-001", "8", "10"), // ratio 0.8
            product("BAD-001", "2", "10"), // ratio 0.2
            product("OFF-001", "0", "0"),  // opted out
        ];

        let items = evaluate_low_stock(&products);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_code, "BAD-001");
        assert_eq!(items[0].coverage_ratio, dec("0.2"));
        assert_eq!(items[1].product_code, "MED-001");
        assert_eq!(items[1].coverage_ratio, dec("0.8"));
    }

    /// Fully stocked products never appear
    #[test]
    fn test_healthy_stock_excluded() {
        let items = evaluate_low_stock(&[product("A-001", "50", "10")]);
        assert!(items.is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating non-negative quantities
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn products_strategy() -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec((quantity_strategy(), quantity_strategy()), 0..30).prop_map(
            |pairs| {
                pairs
                    .into_iter()
                    .map(|(current, min)| {
                        let mut p = product("P-001", "0", "0");
                        p.current_stock = current;
                        p.min_stock = min;
                        p
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every flagged product is genuinely below its positive threshold
        #[test]
        fn prop_flagged_iff_below_positive_threshold(products in products_strategy()) {
            let items = evaluate_low_stock(&products);

            for item in &items {
                prop_assert!(item.min_stock > Decimal::ZERO);
                prop_assert!(item.current_stock < item.min_stock);
            }

            let expected = products
                .iter()
                .filter(|p| p.min_stock > Decimal::ZERO && p.current_stock < p.min_stock)
                .count();
            prop_assert_eq!(items.len(), expected);
        }

        /// The list is sorted by coverage ratio ascending
        #[test]
        fn prop_sorted_by_coverage(products in products_strategy()) {
            let items = evaluate_low_stock(&products);
            for pair in items.windows(2) {
                prop_assert!(pair[0].coverage_ratio <= pair[1].coverage_ratio);
            }
        }
    }
}
