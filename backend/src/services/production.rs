//! Production run execution service
//!
//! Executes a recipe at a multiplier as one atomic ledger batch. A run either
//! applies completely or is recorded as rejected with its shortfall detail;
//! there is no partial consumption. The pre-check against current stock is
//! advisory: the ledger's conditional updates are the commit-time authority,
//! so a run that loses a race is rejected even when the pre-check passed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::ledger::LedgerService;
use shared::{
    build_production_batch, find_shortfalls, rejection_reason, scale_ingredients,
    validate_multiplier, IngredientStock, ProductionRun, Recipe, RunIngredient, RunStatus,
    StockShortfall,
};

/// Production run execution service
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
}

/// Database row for a production run
#[derive(Debug, sqlx::FromRow)]
struct RunRow {
    id: Uuid,
    recipe_id: Uuid,
    multiplier: Decimal,
    status: String,
    rejection_reason: Option<String>,
    output_product_id: Uuid,
    output_quantity: Decimal,
    shortfalls: serde_json::Value,
    actor_id: Uuid,
    created_at: DateTime<Utc>,
}

/// Database row for a frozen run ingredient
#[derive(Debug, sqlx::FromRow)]
struct RunIngredientRow {
    product_id: Uuid,
    quantity: Decimal,
}

impl RunRow {
    fn into_run(self, ingredients: Vec<RunIngredientRow>) -> AppResult<ProductionRun> {
        let status: RunStatus = self
            .status
            .parse()
            .map_err(|e: String| AppError::InternalError(anyhow::anyhow!(e)))?;
        let shortfalls: Vec<StockShortfall> = serde_json::from_value(self.shortfalls)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;
        Ok(ProductionRun {
            id: self.id,
            recipe_id: self.recipe_id,
            multiplier: self.multiplier,
            status,
            rejection_reason: self.rejection_reason,
            output_product_id: self.output_product_id,
            output_quantity: self.output_quantity,
            ingredients: ingredients
                .into_iter()
                .map(|row| RunIngredient {
                    product_id: row.product_id,
                    quantity: row.quantity,
                })
                .collect(),
            shortfalls,
            actor_id: self.actor_id,
            created_at: self.created_at,
        })
    }
}

const RUN_COLUMNS: &str = "id, recipe_id, multiplier, status, rejection_reason, \
     output_product_id, output_quantity, shortfalls, actor_id, created_at";

/// Input for executing a production run
#[derive(Debug, Deserialize, Validate)]
pub struct ExecuteRunInput {
    pub recipe_id: Uuid,
    pub multiplier: Decimal,
}

impl ProductionService {
    /// Create a new ProductionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Execute a recipe as one atomic production run
    ///
    /// Rejected runs are persisted too: a kitchen that asked for a batch it
    /// could not make is an operational fact worth keeping.
    pub async fn execute(&self, input: ExecuteRunInput, actor_id: Uuid) -> AppResult<ProductionRun> {
        validate_multiplier(input.multiplier)
            .map_err(|msg| AppError::InvalidMultiplier(msg.to_string()))?;

        let recipe = self.load_recipe(input.recipe_id).await?;
        let required = scale_ingredients(&recipe.ingredients, input.multiplier);
        let output_quantity = recipe.output_quantity * input.multiplier;

        let available = self.read_stocks(&required).await?;
        let shortfalls = find_shortfalls(&required, &available);
        if !shortfalls.is_empty() {
            return self
                .record_rejected(&recipe, input.multiplier, output_quantity, &required, shortfalls, actor_id)
                .await;
        }

        let mut tx = self.db.begin().await?;
        let run_id = Self::insert_run(
            &mut tx,
            &recipe,
            input.multiplier,
            output_quantity,
            RunStatus::Applied,
            None,
            &[],
            actor_id,
        )
        .await?;
        Self::insert_run_ingredients(&mut tx, run_id, &required).await?;

        let batch = build_production_batch(
            run_id,
            &required,
            recipe.output_product_id,
            output_quantity,
        );
        match LedgerService::apply_batch_tx(&mut tx, &batch, actor_id).await {
            Ok(_) => {
                tx.commit().await?;
                self.get_run(run_id).await
            }
            Err(AppError::BatchRejected { shortfalls }) => {
                // Lost a race after the pre-check passed. The ledger's
                // rejection names the product that came up short at commit
                // time, so record that rather than re-reading stock that may
                // have moved again since.
                tx.rollback().await?;
                self.record_rejected(&recipe, input.multiplier, output_quantity, &required, shortfalls, actor_id)
                    .await
            }
            Err(other) => {
                tx.rollback().await?;
                Err(other)
            }
        }
    }

    /// Get a production run with its frozen ingredient snapshot
    pub async fn get_run(&self, run_id: Uuid) -> AppResult<ProductionRun> {
        let row = sqlx::query_as::<_, RunRow>(&format!(
            "SELECT {} FROM production_runs WHERE id = $1",
            RUN_COLUMNS
        ))
        .bind(run_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Production run".to_string()))?;

        let ingredients = self.run_ingredients(run_id).await?;
        row.into_run(ingredients)
    }

    /// List production runs, newest first
    pub async fn list_runs(&self, limit: i64) -> AppResult<Vec<ProductionRun>> {
        let rows = sqlx::query_as::<_, RunRow>(&format!(
            "SELECT {} FROM production_runs ORDER BY created_at DESC, id DESC LIMIT $1",
            RUN_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        let mut runs = Vec::with_capacity(rows.len());
        for row in rows {
            let ingredients = self.run_ingredients(row.id).await?;
            runs.push(row.into_run(ingredients)?);
        }
        Ok(runs)
    }

    async fn load_recipe(&self, recipe_id: Uuid) -> AppResult<Recipe> {
        crate::services::recipe::RecipeService::new(self.db.clone())
            .get(recipe_id)
            .await
    }

    /// Read current stock for every required ingredient, with product
    /// identity for shortfall reporting
    async fn read_stocks(&self, required: &[RunIngredient]) -> AppResult<Vec<IngredientStock>> {
        let ids: Vec<Uuid> = required.iter().map(|r| r.product_id).collect();

        #[derive(sqlx::FromRow)]
        struct StockRow {
            id: Uuid,
            code: String,
            name: String,
            current_stock: Decimal,
        }

        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT id, code, name, current_stock FROM products WHERE id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        if rows.len() != ids.len() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(rows
            .into_iter()
            .map(|row| IngredientStock {
                product_id: row.id,
                product_code: row.code,
                product_name: row.name,
                current_stock: row.current_stock,
            })
            .collect())
    }

    async fn record_rejected(
        &self,
        recipe: &Recipe,
        multiplier: Decimal,
        output_quantity: Decimal,
        required: &[RunIngredient],
        shortfalls: Vec<StockShortfall>,
        actor_id: Uuid,
    ) -> AppResult<ProductionRun> {
        let reason = rejection_reason(&shortfalls);

        let mut tx = self.db.begin().await?;
        let run_id = Self::insert_run(
            &mut tx,
            recipe,
            multiplier,
            output_quantity,
            RunStatus::Rejected,
            Some(&reason),
            &shortfalls,
            actor_id,
        )
        .await?;
        Self::insert_run_ingredients(&mut tx, run_id, required).await?;
        tx.commit().await?;

        self.get_run(run_id).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_run(
        tx: &mut Transaction<'_, Postgres>,
        recipe: &Recipe,
        multiplier: Decimal,
        output_quantity: Decimal,
        status: RunStatus,
        rejection_reason: Option<&str>,
        shortfalls: &[StockShortfall],
        actor_id: Uuid,
    ) -> AppResult<Uuid> {
        let run_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO production_runs
                (recipe_id, multiplier, status, rejection_reason,
                 output_product_id, output_quantity, shortfalls, actor_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(recipe.id)
        .bind(multiplier)
        .bind(status.as_str())
        .bind(rejection_reason)
        .bind(recipe.output_product_id)
        .bind(output_quantity)
        .bind(serde_json::to_value(shortfalls).map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?)
        .bind(actor_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(run_id)
    }

    async fn insert_run_ingredients(
        tx: &mut Transaction<'_, Postgres>,
        run_id: Uuid,
        required: &[RunIngredient],
    ) -> AppResult<()> {
        for ingredient in required {
            sqlx::query(
                r#"
                INSERT INTO production_run_ingredients (production_run_id, product_id, quantity)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(run_id)
            .bind(ingredient.product_id)
            .bind(ingredient.quantity)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn run_ingredients(&self, run_id: Uuid) -> AppResult<Vec<RunIngredientRow>> {
        Ok(sqlx::query_as::<_, RunIngredientRow>(
            r#"
            SELECT product_id, quantity
            FROM production_run_ingredients
            WHERE production_run_id = $1
            ORDER BY product_id ASC
            "#,
        )
        .bind(run_id)
        .fetch_all(&self.db)
        .await?)
    }
}
