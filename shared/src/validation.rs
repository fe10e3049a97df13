//! Validation rules for the Restaurant Inventory Management Platform
//!
//! Precondition checks stated by the core contracts, kept pure so the
//! backend and any client validate identically.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::recipe::RecipeIngredientInput;

/// Upper bound on a production multiplier. Keeps scaled quantities well
/// inside `Decimal` range so scaling arithmetic cannot overflow.
pub const MAX_MULTIPLIER: u32 = 10_000;

/// Upper bound on any recipe quantity, for the same reason.
pub const MAX_QUANTITY: u32 = 1_000_000;

// ============================================================================
// Recipe Validations
// ============================================================================

/// Validate a recipe definition before it reaches the catalog
///
/// Rejects a non-positive output quantity, an empty ingredient set, any
/// non-positive ingredient quantity, a duplicated ingredient, or a recipe
/// whose output appears among its own ingredients.
pub fn validate_recipe(
    output_product_id: Uuid,
    output_quantity: Decimal,
    ingredients: &[RecipeIngredientInput],
) -> Result<(), &'static str> {
    if output_quantity <= Decimal::ZERO {
        return Err("Output quantity must be positive");
    }
    if output_quantity > Decimal::from(MAX_QUANTITY) {
        return Err("Output quantity cannot exceed 1000000");
    }
    if ingredients.is_empty() {
        return Err("Recipe must have at least one ingredient");
    }
    for (i, ingredient) in ingredients.iter().enumerate() {
        if ingredient.quantity <= Decimal::ZERO {
            return Err("Ingredient quantities must be positive");
        }
        if ingredient.quantity > Decimal::from(MAX_QUANTITY) {
            return Err("Ingredient quantities cannot exceed 1000000");
        }
        if ingredient.product_id == output_product_id {
            return Err("Recipe output cannot appear among its ingredients");
        }
        if ingredients[..i]
            .iter()
            .any(|other| other.product_id == ingredient.product_id)
        {
            return Err("Duplicate ingredient in recipe");
        }
    }
    Ok(())
}

/// Validate a production multiplier (positive, at most [`MAX_MULTIPLIER`])
pub fn validate_multiplier(multiplier: Decimal) -> Result<(), &'static str> {
    if multiplier <= Decimal::ZERO {
        return Err("Multiplier must be positive");
    }
    if multiplier > Decimal::from(MAX_MULTIPLIER) {
        return Err("Multiplier cannot exceed 10000");
    }
    Ok(())
}

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate a counted quantity from a station
pub fn validate_counted_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Counted quantity cannot be negative");
    }
    Ok(())
}

/// Validate a minimum-stock threshold (zero disables monitoring)
pub fn validate_min_stock(min_stock: Decimal) -> Result<(), &'static str> {
    if min_stock < Decimal::ZERO {
        return Err("Minimum stock cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate product code format (3-20 chars, uppercase alphanumeric plus '-')
pub fn validate_product_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Product code must be at least 3 characters");
    }
    if code.len() > 20 {
        return Err("Product code must be at most 20 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Product code must be uppercase alphanumeric (with '-')");
    }
    Ok(())
}

/// Validate a display name is non-blank
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ing(product_id: Uuid, qty: &str) -> RecipeIngredientInput {
        RecipeIngredientInput {
            product_id,
            quantity: dec(qty),
        }
    }

    // ========================================================================
    // Recipe Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_recipe_valid() {
        let output = Uuid::new_v4();
        let ingredients = vec![ing(Uuid::new_v4(), "0.5"), ing(Uuid::new_v4(), "2")];
        assert!(validate_recipe(output, dec("10"), &ingredients).is_ok());
    }

    #[test]
    fn test_validate_recipe_zero_output() {
        let output = Uuid::new_v4();
        let ingredients = vec![ing(Uuid::new_v4(), "1")];
        assert!(validate_recipe(output, Decimal::ZERO, &ingredients).is_err());
    }

    #[test]
    fn test_validate_recipe_empty_ingredients() {
        assert!(validate_recipe(Uuid::new_v4(), dec("1"), &[]).is_err());
    }

    #[test]
    fn test_validate_recipe_non_positive_ingredient() {
        let output = Uuid::new_v4();
        let ingredients = vec![ing(Uuid::new_v4(), "0")];
        assert!(validate_recipe(output, dec("1"), &ingredients).is_err());
    }

    #[test]
    fn test_validate_recipe_self_reference() {
        let output = Uuid::new_v4();
        let ingredients = vec![ing(Uuid::new_v4(), "1"), ing(output, "2")];
        assert!(validate_recipe(output, dec("1"), &ingredients).is_err());
    }

    #[test]
    fn test_validate_recipe_duplicate_ingredient() {
        let output = Uuid::new_v4();
        let repeated = Uuid::new_v4();
        let ingredients = vec![ing(repeated, "1"), ing(repeated, "2")];
        assert!(validate_recipe(output, dec("1"), &ingredients).is_err());
    }

    #[test]
    fn test_validate_recipe_quantity_cap() {
        let output = Uuid::new_v4();
        let ingredients = vec![ing(Uuid::new_v4(), "1000001")];
        assert!(validate_recipe(output, dec("1"), &ingredients).is_err());
        assert!(validate_recipe(output, dec("1000001"), &[ing(Uuid::new_v4(), "1")]).is_err());
        assert!(validate_recipe(output, dec("1000000"), &[ing(Uuid::new_v4(), "1000000")]).is_ok());
    }

    #[test]
    fn test_validate_multiplier() {
        assert!(validate_multiplier(dec("1")).is_ok());
        assert!(validate_multiplier(dec("0.5")).is_ok());
        assert!(validate_multiplier(Decimal::ZERO).is_err());
        assert!(validate_multiplier(dec("-2")).is_err());
    }

    /// A multiplier near Decimal's ceiling would overflow the scaling
    /// arithmetic; the bound refuses it long before any multiplication
    #[test]
    fn test_validate_multiplier_cap() {
        assert!(validate_multiplier(dec("10000")).is_ok());
        assert!(validate_multiplier(dec("10000.1")).is_err());
        assert!(validate_multiplier(dec("70000000000000000000000000000")).is_err());
    }

    // ========================================================================
    // Stock Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_counted_quantity() {
        assert!(validate_counted_quantity(Decimal::ZERO).is_ok());
        assert!(validate_counted_quantity(dec("3.5")).is_ok());
        assert!(validate_counted_quantity(dec("-0.1")).is_err());
    }

    #[test]
    fn test_validate_min_stock() {
        assert!(validate_min_stock(Decimal::ZERO).is_ok());
        assert!(validate_min_stock(dec("-1")).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_product_code_valid() {
        assert!(validate_product_code("PES-001").is_ok());
        assert!(validate_product_code("ABC").is_ok());
    }

    #[test]
    fn test_validate_product_code_invalid() {
        assert!(validate_product_code("ab").is_err());
        assert!(validate_product_code("pes-001").is_err());
        assert!(validate_product_code("TOO-LONG-CODE-FOR-THE-FIELD").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ceviche").is_ok());
        assert!(validate_name("   ").is_err());
    }
}
