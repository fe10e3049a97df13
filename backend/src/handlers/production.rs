//! HTTP handlers for production run execution

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentActor;
use crate::services::production::{ExecuteRunInput, ProductionService};
use crate::AppState;
use shared::ProductionRun;

#[derive(Debug, Deserialize)]
pub struct RunListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Execute a production run
///
/// Returns 200 for both applied and rejected runs; a rejection is a recorded
/// outcome, not a request error. Check `status` and `shortfalls`.
pub async fn execute_run(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(input): Json<ExecuteRunInput>,
) -> AppResult<Json<ProductionRun>> {
    let service = ProductionService::new(state.db);
    let run = service.execute(input, actor.id()).await?;
    Ok(Json(run))
}

/// List production runs, newest first
pub async fn list_runs(
    State(state): State<AppState>,
    Query(query): Query<RunListQuery>,
) -> AppResult<Json<Vec<ProductionRun>>> {
    let service = ProductionService::new(state.db);
    let runs = service.list_runs(query.limit).await?;
    Ok(Json(runs))
}

/// Get a production run with its frozen snapshot
pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> AppResult<Json<ProductionRun>> {
    let service = ProductionService::new(state.db);
    let run = service.get_run(run_id).await?;
    Ok(Json(run))
}
