//! Recipe catalog service
//!
//! Recipes are read-mostly and carry no version history: runs freeze the
//! quantities they consumed, so editing a recipe never rewrites the past.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{validate_recipe, Recipe, RecipeIngredient, RecipeIngredientInput};

/// Recipe catalog service
#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
}

/// Database row for a recipe
#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: Uuid,
    name: String,
    output_product_id: Uuid,
    output_quantity: Decimal,
    instructions: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Database row for a recipe ingredient
#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    product_id: Uuid,
    quantity: Decimal,
    position: i32,
}

impl RecipeRow {
    fn into_recipe(self, ingredients: Vec<IngredientRow>) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name,
            output_product_id: self.output_product_id,
            output_quantity: self.output_quantity,
            instructions: self.instructions,
            ingredients: ingredients
                .into_iter()
                .map(|row| RecipeIngredient {
                    product_id: row.product_id,
                    quantity: row.quantity,
                    position: row.position,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for creating or replacing a recipe definition
#[derive(Debug, Deserialize, Validate)]
pub struct RecipeDefinitionInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub output_product_id: Uuid,
    pub output_quantity: Decimal,
    pub instructions: Option<String>,
    pub ingredients: Vec<RecipeIngredientInput>,
}

impl RecipeService {
    /// Create a new RecipeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a recipe
    pub async fn create(&self, input: RecipeDefinitionInput) -> AppResult<Recipe> {
        self.check_definition(&input).await?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            INSERT INTO recipes (name, output_product_id, output_quantity, instructions)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, output_product_id, output_quantity, instructions,
                      created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.output_product_id)
        .bind(input.output_quantity)
        .bind(&input.instructions)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_ingredients(&mut tx, row.id, &input.ingredients).await?;

        tx.commit().await?;

        self.get(row.id).await
    }

    /// Get a recipe with its ordered ingredient lines
    pub async fn get(&self, recipe_id: Uuid) -> AppResult<Recipe> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, name, output_product_id, output_quantity, instructions,
                   created_at, updated_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        let ingredients = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT product_id, quantity, position
            FROM recipe_ingredients
            WHERE recipe_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db)
        .await?;

        Ok(row.into_recipe(ingredients))
    }

    /// List all recipes (with ingredient lines)
    pub async fn list(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, name, output_product_id, output_quantity, instructions,
                   created_at, updated_at
            FROM recipes
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            let ingredients = sqlx::query_as::<_, IngredientRow>(
                r#"
                SELECT product_id, quantity, position
                FROM recipe_ingredients
                WHERE recipe_id = $1
                ORDER BY position ASC
                "#,
            )
            .bind(row.id)
            .fetch_all(&self.db)
            .await?;
            recipes.push(row.into_recipe(ingredients));
        }

        Ok(recipes)
    }

    /// Replace a recipe definition
    ///
    /// Allowed even after the recipe has been used: completed runs keep their
    /// frozen snapshots, so the edit has no retroactive effect.
    pub async fn update(&self, recipe_id: Uuid, input: RecipeDefinitionInput) -> AppResult<Recipe> {
        self.check_definition(&input).await?;

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE recipes
            SET name = $2, output_product_id = $3, output_quantity = $4,
                instructions = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(recipe_id)
        .bind(&input.name)
        .bind(input.output_product_id)
        .bind(input.output_quantity)
        .bind(&input.instructions)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
        Self::insert_ingredients(&mut tx, recipe_id, &input.ingredients).await?;

        tx.commit().await?;

        self.get(recipe_id).await
    }

    /// Validate the definition and that every referenced product exists
    async fn check_definition(&self, input: &RecipeDefinitionInput) -> AppResult<()> {
        input.validate()?;
        validate_recipe(
            input.output_product_id,
            input.output_quantity,
            &input.ingredients,
        )
        .map_err(|msg| AppError::InvalidRecipe(msg.to_string()))?;

        let mut product_ids: Vec<Uuid> = input
            .ingredients
            .iter()
            .map(|ing| ing.product_id)
            .collect();
        product_ids.push(input.output_product_id);

        let known = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE id = ANY($1)",
        )
        .bind(&product_ids)
        .fetch_one(&self.db)
        .await?;

        if known != product_ids.len() as i64 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    async fn insert_ingredients(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: Uuid,
        ingredients: &[RecipeIngredientInput],
    ) -> AppResult<()> {
        for (position, ingredient) in ingredients.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO recipe_ingredients (recipe_id, product_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(recipe_id)
            .bind(ingredient.product_id)
            .bind(ingredient.quantity)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
