//! HTTP handlers for physical inventory counts

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentActor;
use crate::services::counts::{CountFilter, CountOutcome, CountService, SubmitCountInput};
use crate::AppState;
use shared::InventoryCount;

/// Submit a physical count and reconcile stock to it
pub async fn submit_count(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(input): Json<SubmitCountInput>,
) -> AppResult<Json<CountOutcome>> {
    let service = CountService::new(state.db);
    let outcome = service.submit(input, actor.id()).await?;
    Ok(Json(outcome))
}

/// List counts, filterable by product, station and local day
pub async fn list_counts(
    State(state): State<AppState>,
    Query(filter): Query<CountFilter>,
) -> AppResult<Json<Vec<InventoryCount>>> {
    let offset = state.config.reporting.utc_offset_minutes;
    let service = CountService::new(state.db);
    let counts = service.list(filter, offset).await?;
    Ok(Json(counts))
}

/// Latest count per product for a station during the current operational day
pub async fn get_station_counts_today(
    State(state): State<AppState>,
    Path(station_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryCount>>> {
    let offset = state.config.reporting.utc_offset_minutes;
    let service = CountService::new(state.db);
    let counts = service.latest_for_station_today(station_id, offset).await?;
    Ok(Json(counts))
}

/// Count history for a product, newest first
pub async fn get_product_counts(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryCount>>> {
    let service = CountService::new(state.db);
    let counts = service.history_for_product(product_id).await?;
    Ok(Json(counts))
}
