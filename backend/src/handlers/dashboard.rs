//! HTTP handlers for the operations dashboard

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::reporting::ReportingService;
use crate::AppState;
use shared::{DashboardSnapshot, LowStockItem};

/// Full dashboard snapshot: station reporting status plus low-stock alerts
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardSnapshot>> {
    let offset = state.config.reporting.utc_offset_minutes;
    let service = ReportingService::new(state.db, offset);
    let snapshot = service.dashboard().await?;
    Ok(Json(snapshot))
}

/// Low-stock alerts over active products, most critical first
pub async fn get_low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<LowStockItem>>> {
    let offset = state.config.reporting.utc_offset_minutes;
    let service = ReportingService::new(state.db, offset);
    let items = service.low_stock().await?;
    Ok(Json(items))
}
