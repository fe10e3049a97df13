//! Catalog service for product, category and station master data
//!
//! Stock quantities are never edited here: `current_stock` belongs to the
//! ledger. Products referenced by recipes or movements are soft-deactivated,
//! never deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    validate_min_stock, validate_product_code, Category, Product, Station, UnitOfMeasure,
};

/// Catalog service for master data management
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Database row for a product
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    code: String,
    name: String,
    category_id: Uuid,
    unit: String,
    min_stock: Decimal,
    current_stock: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let unit = row
            .unit
            .parse::<UnitOfMeasure>()
            .map_err(AppError::Internal)?;
        Ok(Product {
            id: row.id,
            code: row.code,
            name: row.name,
            category_id: row.category_id,
            unit,
            min_stock: row.min_stock,
            current_stock: row.current_stock,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Database row for a category
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Database row for a station
#[derive(Debug, sqlx::FromRow)]
struct StationRow {
    id: Uuid,
    name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Station {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a category
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

/// Input for updating a category
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Input for creating a product
///
/// Products are created with zero stock; initial quantities enter the ledger
/// as manual adjustments so the audit trail starts complete.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub category_id: Uuid,
    pub unit: UnitOfMeasure,
    pub min_stock: Option<Decimal>,
}

/// Input for updating a product
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub min_stock: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Input for creating a station
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStationInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Input for updating a station
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStationInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// Create a category
    pub async fn create_category(&self, input: CreateCategoryInput) -> AppResult<Category> {
        input.validate()?;

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| Self::map_unique(e, "name"))?;

        Ok(row.into())
    }

    /// List all categories
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get a category by id
    pub async fn get_category(&self, category_id: Uuid) -> AppResult<Category> {
        sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_at FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .map(Category::from)
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    /// Update a category
    pub async fn update_category(
        &self,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> AppResult<Category> {
        input.validate()?;

        sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name), description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(category_id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| Self::map_unique(e, "name"))?
        .map(Category::from)
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    /// Create a product with zero initial stock
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;
        validate_product_code(&input.code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
            message_es: "Código de producto inválido".to_string(),
        })?;
        let min_stock = input.min_stock.unwrap_or(Decimal::ZERO);
        validate_min_stock(min_stock).map_err(|msg| AppError::Validation {
            field: "min_stock".to_string(),
            message: msg.to_string(),
            message_es: "El stock mínimo no puede ser negativo".to_string(),
        })?;

        // FK failure on category shows up as a database error; check first
        // for a friendlier response
        self.get_category(input.category_id).await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (code, name, category_id, unit, min_stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, code, name, category_id, unit, min_stock, current_stock,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.unit.as_str())
        .bind(min_stock)
        .fetch_one(&self.db)
        .await
        .map_err(|e| Self::map_unique(e, "code"))?;

        row.try_into()
    }

    /// List products, optionally including deactivated ones
    pub async fn list_products(&self, include_inactive: bool) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, code, name, category_id, unit, min_stock, current_stock,
                   is_active, created_at, updated_at
            FROM products
            WHERE is_active OR $1
            ORDER BY code ASC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, code, name, category_id, unit, min_stock, current_stock,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        row.try_into()
    }

    /// Update product master data (stock itself is ledger-only)
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        input.validate()?;
        if let Some(min_stock) = input.min_stock {
            validate_min_stock(min_stock).map_err(|msg| AppError::Validation {
                field: "min_stock".to_string(),
                message: msg.to_string(),
                message_es: "El stock mínimo no puede ser negativo".to_string(),
            })?;
        }
        if let Some(category_id) = input.category_id {
            self.get_category(category_id).await?;
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                category_id = COALESCE($3, category_id),
                min_stock = COALESCE($4, min_stock),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, name, category_id, unit, min_stock, current_stock,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.min_stock)
        .bind(input.is_active)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        row.try_into()
    }

    /// Soft-deactivate a product; hard deletion is never offered because
    /// movements and recipe ingredients keep referencing it
    pub async fn deactivate_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, name, category_id, unit, min_stock, current_stock,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        row.try_into()
    }

    // ------------------------------------------------------------------
    // Stations
    // ------------------------------------------------------------------

    /// Create a station
    pub async fn create_station(&self, input: CreateStationInput) -> AppResult<Station> {
        input.validate()?;

        let row = sqlx::query_as::<_, StationRow>(
            r#"
            INSERT INTO stations (name)
            VALUES ($1)
            RETURNING id, name, is_active, created_at
            "#,
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| Self::map_unique(e, "name"))?;

        Ok(row.into())
    }

    /// List all stations
    pub async fn list_stations(&self) -> AppResult<Vec<Station>> {
        let rows = sqlx::query_as::<_, StationRow>(
            "SELECT id, name, is_active, created_at FROM stations ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Station::from).collect())
    }

    /// Get a station by id
    pub async fn get_station(&self, station_id: Uuid) -> AppResult<Station> {
        sqlx::query_as::<_, StationRow>(
            "SELECT id, name, is_active, created_at FROM stations WHERE id = $1",
        )
        .bind(station_id)
        .fetch_optional(&self.db)
        .await?
        .map(Station::from)
        .ok_or_else(|| AppError::NotFound("Station".to_string()))
    }

    /// Update a station
    pub async fn update_station(
        &self,
        station_id: Uuid,
        input: UpdateStationInput,
    ) -> AppResult<Station> {
        input.validate()?;

        sqlx::query_as::<_, StationRow>(
            r#"
            UPDATE stations
            SET name = COALESCE($2, name), is_active = COALESCE($3, is_active)
            WHERE id = $1
            RETURNING id, name, is_active, created_at
            "#,
        )
        .bind(station_id)
        .bind(&input.name)
        .bind(input.is_active)
        .fetch_optional(&self.db)
        .await?
        .map(Station::from)
        .ok_or_else(|| AppError::NotFound("Station".to_string()))
    }

    fn map_unique(e: sqlx::Error, field: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::DuplicateEntry(field.to_string());
            }
        }
        e.into()
    }
}
