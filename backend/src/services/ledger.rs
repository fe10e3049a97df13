//! Stock ledger service
//!
//! Single write path for every product's stock. Each change is an
//! append-only movement row plus an atomic update of the product's cached
//! `current_stock` projection, so the projection always equals the sum of
//! the product's movement deltas and never goes negative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    MovementKind, NewMovement, PaginatedResponse, Pagination, PaginationMeta, StockMovement,
    StockShortfall,
};

/// Ledger service: append, batch-apply and read stock movements
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// Database row for a stock movement
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: Uuid,
    product_id: Uuid,
    delta: Decimal,
    kind: String,
    reference_id: Option<Uuid>,
    actor_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<MovementKind>()
            .map_err(AppError::Internal)?;
        Ok(StockMovement {
            id: row.id,
            product_id: row.product_id,
            delta: row.delta,
            kind,
            reference_id: row.reference_id,
            actor_id: row.actor_id,
            created_at: row.created_at,
        })
    }
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append a single movement, updating the projection atomically
    ///
    /// Zero deltas are rejected outright. A delta that would take the
    /// projection negative fails with `InsufficientStock` naming the gap.
    /// Count adjustments are derived from a floor-clamped counted value and
    /// always land on a non-negative projection, so they pass through.
    pub async fn append(&self, entry: NewMovement, actor_id: Uuid) -> AppResult<StockMovement> {
        if entry.delta.is_zero() {
            return Err(AppError::InvalidDelta(
                "Delta must be non-zero".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        let result =
            Self::apply_batch_tx(&mut tx, std::slice::from_ref(&entry), actor_id).await;
        let mut movements = match result {
            Ok(movements) => movements,
            Err(AppError::BatchRejected { shortfalls }) if !entry.kind.is_count_adjustment() => {
                return Err(AppError::InsufficientStock { shortfalls });
            }
            Err(e) => return Err(e),
        };
        tx.commit().await?;
        Ok(movements.remove(0))
    }

    /// Apply a set of movements as one all-or-nothing unit inside the
    /// caller's transaction
    ///
    /// Entries are applied in ascending product-id order; conflicting writes
    /// against the same product serialize on the row lock, so two concurrent
    /// batches over overlapping products either deadlock-free queue up or
    /// one of them is rejected when the invariant would break. The
    /// conditional update re-checks `current_stock + delta >= 0` at commit
    /// time, which makes any caller-side availability check advisory only.
    pub async fn apply_batch_tx(
        tx: &mut Transaction<'_, Postgres>,
        entries: &[NewMovement],
        actor_id: Uuid,
    ) -> AppResult<Vec<StockMovement>> {
        let mut ordered: Vec<&NewMovement> = entries.iter().collect();
        ordered.sort_by_key(|e| e.product_id);

        let mut movements = Vec::with_capacity(ordered.len());
        for entry in ordered {
            let updated = sqlx::query_scalar::<_, Decimal>(
                r#"
                UPDATE products
                SET current_stock = current_stock + $2, updated_at = NOW()
                WHERE id = $1 AND current_stock + $2 >= 0
                RETURNING current_stock
                "#,
            )
            .bind(entry.product_id)
            .bind(entry.delta)
            .fetch_optional(&mut **tx)
            .await?;

            if updated.is_none() {
                return Err(Self::rejection_for(tx, entry).await?);
            }

            let row = sqlx::query_as::<_, MovementRow>(
                r#"
                INSERT INTO stock_movements (product_id, delta, kind, reference_id, actor_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, product_id, delta, kind, reference_id, actor_id, created_at
                "#,
            )
            .bind(entry.product_id)
            .bind(entry.delta)
            .bind(entry.kind.as_str())
            .bind(entry.reference_id)
            .bind(actor_id)
            .fetch_one(&mut **tx)
            .await?;

            movements.push(row.try_into()?);
        }

        Ok(movements)
    }

    /// Current projection for a product; never replays history on reads
    pub async fn current_stock(&self, product_id: Uuid) -> AppResult<Decimal> {
        sqlx::query_scalar::<_, Decimal>("SELECT current_stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Ordered movement history for a product, paginated for audit tooling
    pub async fn history(
        &self,
        product_id: Uuid,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<StockMovement>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_movements WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, product_id, delta, kind, reference_id, actor_id, created_at
            FROM stock_movements
            WHERE product_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(product_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(StockMovement::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(pagination, total as u64),
        })
    }

    /// Build the rejection for an entry whose conditional update hit no row:
    /// either the product does not exist or the delta would break the
    /// non-negative invariant
    async fn rejection_for(
        tx: &mut Transaction<'_, Postgres>,
        entry: &NewMovement,
    ) -> AppResult<AppError> {
        let product = sqlx::query_as::<_, (String, String, Decimal)>(
            "SELECT code, name, current_stock FROM products WHERE id = $1",
        )
        .bind(entry.product_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(match product {
            None => AppError::NotFound("Product".to_string()),
            Some((code, name, available)) => {
                let required = -entry.delta;
                AppError::BatchRejected {
                    shortfalls: vec![StockShortfall {
                        product_id: entry.product_id,
                        product_code: code,
                        product_name: name,
                        required,
                        available,
                        shortfall: required - available,
                    }],
                }
            }
        })
    }
}
