use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, StatusDto};
use crate::sync::SyncReport;

/// Kicks off a full ingestion run and blocks until it finishes. Only one
/// run may be in flight; a second trigger conflicts instead of overlapping.
pub async fn trigger_sync(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SyncReport>>, ApiError> {
    match state.sync.try_run().await {
        Some(report) => Ok(Json(ApiResponse::success(report))),
        None => Err(ApiError::Conflict(
            "A catalog sync is already running".to_string(),
        )),
    }
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatusDto>>, ApiError> {
    let anime_count = state.store.count_anime().await?;

    Ok(Json(ApiResponse::success(StatusDto {
        anime_count,
        sync_running: state.sync.is_running(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })))
}

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}
