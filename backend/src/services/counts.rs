//! Inventory count service
//!
//! Physical counts reconcile the ledger to reality. A submitted count locks
//! the product row, records the observation, and appends one adjustment
//! movement sized so the projection lands exactly on the counted quantity.
//! Counts may push stock down as well as up; they are the only movement kind
//! allowed to do that without a floor check failing the request.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ledger::LedgerService;
use shared::{
    day_bounds_for_date, local_day_bounds, reconciliation_delta, validate_counted_quantity,
    InventoryCount, MovementKind, NewMovement,
};

/// Inventory count service
#[derive(Clone)]
pub struct CountService {
    db: PgPool,
}

/// Database row for an inventory count
#[derive(Debug, sqlx::FromRow)]
struct CountRow {
    id: Uuid,
    product_id: Uuid,
    station_id: Uuid,
    counted_quantity: Decimal,
    operator_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<CountRow> for InventoryCount {
    fn from(row: CountRow) -> Self {
        InventoryCount {
            id: row.id,
            product_id: row.product_id,
            station_id: row.station_id,
            counted_quantity: row.counted_quantity,
            operator_id: row.operator_id,
            created_at: row.created_at,
        }
    }
}

/// Input for submitting a physical count
#[derive(Debug, Deserialize)]
pub struct SubmitCountInput {
    pub product_id: Uuid,
    pub station_id: Uuid,
    pub counted_quantity: Decimal,
}

/// Filters for listing counts; `day` is a local operational date
#[derive(Debug, Default, Deserialize)]
pub struct CountFilter {
    pub product_id: Option<Uuid>,
    pub station_id: Option<Uuid>,
    pub day: Option<chrono::NaiveDate>,
}

/// A submitted count together with the reconciliation it produced
#[derive(Debug, Serialize)]
pub struct CountOutcome {
    pub count: InventoryCount,
    /// Adjustment applied to the projection; zero when the count confirmed it
    pub adjustment: Decimal,
    pub stock_after: Decimal,
}

impl CountService {
    /// Create a new CountService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Submit a physical count and reconcile the projection to it
    pub async fn submit(&self, input: SubmitCountInput, actor_id: Uuid) -> AppResult<CountOutcome> {
        validate_counted_quantity(input.counted_quantity)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let station_exists =
            sqlx::query_scalar::<_, bool>("SELECT is_active FROM stations WHERE id = $1")
                .bind(input.station_id)
                .fetch_optional(&self.db)
                .await?;
        if station_exists.is_none() {
            return Err(AppError::NotFound("Station".to_string()));
        }

        let mut tx = self.db.begin().await?;

        // Lock the product row so the projection we reconcile against cannot
        // move between the read and the adjustment.
        let projected = sqlx::query_scalar::<_, Decimal>(
            "SELECT current_stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let row = sqlx::query_as::<_, CountRow>(
            r#"
            INSERT INTO inventory_counts (product_id, station_id, counted_quantity, operator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, station_id, counted_quantity, operator_id, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.station_id)
        .bind(input.counted_quantity)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        let delta = reconciliation_delta(input.counted_quantity, projected);
        if !delta.is_zero() {
            let adjustment =
                NewMovement::new(input.product_id, delta, MovementKind::CountAdjustment)
                    .with_reference(row.id);
            LedgerService::apply_batch_tx(&mut tx, &[adjustment], actor_id).await?;
        }

        tx.commit().await?;

        Ok(CountOutcome {
            count: row.into(),
            adjustment: delta,
            stock_after: projected + delta,
        })
    }

    /// Latest count per product reported by a station during the current
    /// operational day
    pub async fn latest_for_station_today(
        &self,
        station_id: Uuid,
        utc_offset_minutes: i32,
    ) -> AppResult<Vec<InventoryCount>> {
        let station = sqlx::query_scalar::<_, Uuid>("SELECT id FROM stations WHERE id = $1")
            .bind(station_id)
            .fetch_optional(&self.db)
            .await?;
        if station.is_none() {
            return Err(AppError::NotFound("Station".to_string()));
        }

        let day = local_day_bounds(Utc::now(), utc_offset_minutes);

        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT DISTINCT ON (product_id)
                   id, product_id, station_id, counted_quantity, operator_id, created_at
            FROM inventory_counts
            WHERE station_id = $1 AND created_at >= $2 AND created_at < $3
            ORDER BY product_id, created_at DESC, id DESC
            "#,
        )
        .bind(station_id)
        .bind(day.start_utc)
        .bind(day.end_utc)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryCount::from).collect())
    }

    /// List counts matching the filter, newest first
    pub async fn list(
        &self,
        filter: CountFilter,
        utc_offset_minutes: i32,
    ) -> AppResult<Vec<InventoryCount>> {
        let window = filter.day.map(|d| day_bounds_for_date(d, utc_offset_minutes));

        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT id, product_id, station_id, counted_quantity, operator_id, created_at
            FROM inventory_counts
            WHERE ($1::uuid IS NULL OR product_id = $1)
              AND ($2::uuid IS NULL OR station_id = $2)
              AND ($3::timestamptz IS NULL OR (created_at >= $3 AND created_at < $4))
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.product_id)
        .bind(filter.station_id)
        .bind(window.map(|w| w.start_utc))
        .bind(window.map(|w| w.end_utc))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryCount::from).collect())
    }

    /// Count history for a product, newest first
    pub async fn history_for_product(&self, product_id: Uuid) -> AppResult<Vec<InventoryCount>> {
        let product = sqlx::query_scalar::<_, Uuid>("SELECT id FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?;
        if product.is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT id, product_id, station_id, counted_quantity, operator_id, created_at
            FROM inventory_counts
            WHERE product_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryCount::from).collect())
    }
}
