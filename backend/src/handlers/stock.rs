//! HTTP handlers for stock queries and manual adjustments

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentActor;
use crate::services::ledger::LedgerService;
use crate::AppState;
use shared::{MovementKind, NewMovement, PaginatedResponse, Pagination, StockMovement};

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub product_id: Uuid,
    pub current_stock: Decimal,
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub delta: Decimal,
}

/// Get current stock for a product
pub async fn get_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<StockResponse>> {
    let service = LedgerService::new(state.db);
    let current_stock = service.current_stock(product_id).await?;
    Ok(Json(StockResponse {
        product_id,
        current_stock,
    }))
}

/// Get the movement history for a product, oldest first
pub async fn get_movements(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PaginatedResponse<StockMovement>>> {
    let service = LedgerService::new(state.db);
    let movements = service.history(product_id, pagination).await?;
    Ok(Json(movements))
}

/// Apply a manual stock adjustment
///
/// Rejected with 422 when the delta would take the projection negative.
pub async fn adjust_stock(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(product_id): Path<Uuid>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<StockMovement>> {
    let service = LedgerService::new(state.db);
    let entry = NewMovement::new(product_id, input.delta, MovementKind::ManualAdjustment);
    let movement = service.append(entry, actor.id()).await?;
    Ok(Json(movement))
}
