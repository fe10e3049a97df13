//! Dashboard reporting service
//!
//! Assembles the overview snapshot from live tables on every request; the
//! venue is small enough that no materialization is needed.

use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::catalog::CatalogService;
use shared::{
    evaluate_low_stock, local_day_bounds, summarize_station_reports, DashboardSnapshot,
    InventoryCount, LowStockItem,
};

/// Dashboard reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
    utc_offset_minutes: i32,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool, utc_offset_minutes: i32) -> Self {
        Self {
            db,
            utc_offset_minutes,
        }
    }

    /// Low-stock alerts over active products, most critical first
    pub async fn low_stock(&self) -> AppResult<Vec<LowStockItem>> {
        let products = CatalogService::new(self.db.clone())
            .list_products(false)
            .await?;
        Ok(evaluate_low_stock(&products))
    }

    /// Full dashboard snapshot: station reporting status for the current
    /// operational day plus low-stock alerts
    pub async fn dashboard(&self) -> AppResult<DashboardSnapshot> {
        let catalog = CatalogService::new(self.db.clone());
        let day = local_day_bounds(Utc::now(), self.utc_offset_minutes);

        let stations = catalog.list_stations().await?;
        let active: Vec<_> = stations.into_iter().filter(|s| s.is_active).collect();

        let counts = self.counts_in_window(day.start_utc, day.end_utc).await?;
        let summary = summarize_station_reports(&active, &counts, day.date);

        let products = catalog.list_products(false).await?;
        let low_stock = evaluate_low_stock(&products);

        Ok(DashboardSnapshot { summary, low_stock })
    }

    async fn counts_in_window(
        &self,
        start: chrono::DateTime<Utc>,
        end: chrono::DateTime<Utc>,
    ) -> AppResult<Vec<InventoryCount>> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: uuid::Uuid,
            product_id: uuid::Uuid,
            station_id: uuid::Uuid,
            counted_quantity: rust_decimal::Decimal,
            operator_id: uuid::Uuid,
            created_at: chrono::DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT id, product_id, station_id, counted_quantity, operator_id, created_at
            FROM inventory_counts
            WHERE created_at >= $1 AND created_at < $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| InventoryCount {
                id: row.id,
                product_id: row.product_id,
                station_id: row.station_id,
                counted_quantity: row.counted_quantity,
                operator_id: row.operator_id,
                created_at: row.created_at,
            })
            .collect())
    }
}
