//! Recipe models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recipe: one output product plus an ordered set of ingredients
///
/// Recipes carry no version history. Editing a recipe after it has been used
/// never alters past production runs, because runs freeze the quantities they
/// consumed at execution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub output_product_id: Uuid,
    /// Quantity of the output product produced per execution (multiplier 1)
    pub output_quantity: Decimal,
    pub instructions: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub product_id: Uuid,
    /// Quantity required per execution at multiplier 1, always positive
    pub quantity: Decimal,
    /// Display order within the recipe
    pub position: i32,
}

/// Ingredient line as submitted when creating or editing a recipe;
/// position is taken from submission order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    pub product_id: Uuid,
    pub quantity: Decimal,
}
