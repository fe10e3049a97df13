//! Stock ledger tests
//!
//! Tests for the movement ledger rules:
//! - The stock projection equals the sum of movement deltas
//! - No sequence of accepted movements takes stock negative
//! - Batches apply in ascending product-id order

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{build_production_batch, MovementKind, NewMovement, RunIngredient};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Replays the commit-time rule: a movement is accepted only if the
/// projection stays non-negative, and an accepted movement shifts the
/// projection by exactly its delta.
fn replay(start: Decimal, deltas: &[Decimal]) -> (Decimal, Vec<Decimal>) {
    let mut stock = start;
    let mut accepted = Vec::new();
    for delta in deltas {
        if stock + delta >= Decimal::ZERO {
            stock += delta;
            accepted.push(*delta);
        }
    }
    (stock, accepted)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test movement kind round-trip through storage text
    #[test]
    fn test_movement_kind_storage_text() {
        let kinds = [
            MovementKind::ProductionConsume,
            MovementKind::ProductionOutput,
            MovementKind::CountAdjustment,
            MovementKind::ManualAdjustment,
        ];

        for kind in kinds {
            let parsed: MovementKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    /// Test unknown kind text is rejected
    #[test]
    fn test_unknown_movement_kind_rejected() {
        assert!("teleport".parse::<MovementKind>().is_err());
    }

    /// Test projection after a mixed sequence
    #[test]
    fn test_projection_is_sum_of_deltas() {
        let deltas = [dec("10"), dec("-3"), dec("5.5"), dec("-2.5")];
        let (stock, accepted) = replay(Decimal::ZERO, &deltas);

        assert_eq!(accepted.len(), 4);
        assert_eq!(stock, dec("10"));
        assert_eq!(stock, deltas.iter().sum::<Decimal>());
    }

    /// Test an overdraw is rejected and leaves the projection untouched
    #[test]
    fn test_overdraw_rejected() {
        let (stock, accepted) = replay(dec("4"), &[dec("-5")]);

        assert!(accepted.is_empty());
        assert_eq!(stock, dec("4"));
    }

    /// Test draining to exactly zero is accepted
    #[test]
    fn test_drain_to_zero_accepted() {
        let (stock, accepted) = replay(dec("5"), &[dec("-5")]);

        assert_eq!(accepted.len(), 1);
        assert_eq!(stock, Decimal::ZERO);
    }

    /// Test batch entries sort into ascending product-id order
    #[test]
    fn test_batch_applies_in_product_id_order() {
        let run_id = Uuid::new_v4();
        let ingredients = vec![
            RunIngredient {
                product_id: Uuid::new_v4(),
                quantity: dec("1"),
            },
            RunIngredient {
                product_id: Uuid::new_v4(),
                quantity: dec("2"),
            },
            RunIngredient {
                product_id: Uuid::new_v4(),
                quantity: dec("3"),
            },
        ];
        let batch = build_production_batch(run_id, &ingredients, Uuid::new_v4(), dec("1"));

        let mut entries: Vec<&NewMovement> = batch.iter().collect();
        entries.sort_by_key(|e| e.product_id);
        for pair in entries.windows(2) {
            assert!(pair[0].product_id <= pair[1].product_id);
        }
    }

    /// Test movements carry their reference
    #[test]
    fn test_movement_reference() {
        let run_id = Uuid::new_v4();
        let entry = NewMovement::new(Uuid::new_v4(), dec("1"), MovementKind::ProductionOutput)
            .with_reference(run_id);

        assert_eq!(entry.reference_id, Some(run_id));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating movement deltas, positive and negative
    fn delta_strategy() -> impl Strategy<Value = Decimal> {
        (-10000i64..=10000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating a starting stock level
    fn stock_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The projection never goes negative under any delta sequence
        #[test]
        fn prop_projection_never_negative(
            start in stock_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 0..50),
        ) {
            let (stock, _) = replay(start, &deltas);
            prop_assert!(stock >= Decimal::ZERO);
        }

        /// The projection always equals start plus the accepted deltas
        #[test]
        fn prop_projection_equals_accepted_sum(
            start in stock_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 0..50),
        ) {
            let (stock, accepted) = replay(start, &deltas);
            let expected = start + accepted.iter().sum::<Decimal>();
            prop_assert_eq!(stock, expected);
        }

        /// A rejected movement changes nothing: replaying without it gives
        /// the same final projection
        #[test]
        fn prop_rejection_leaves_no_trace(
            start in stock_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 1..50),
        ) {
            let (stock, accepted) = replay(start, &deltas);
            let (stock_again, accepted_again) = replay(start, &accepted);
            prop_assert_eq!(stock, stock_again);
            prop_assert_eq!(accepted, accepted_again);
        }
    }
}
