//! Health probe and metrics exposition.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, HealthDto};
use crate::domain::{Actor, Guard};

/// `GET /api/health`
///
/// Readiness probe that checks database connectivity.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let database = state.store().ping().await.is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(HealthDto {
            status: if database { "ok" } else { "degraded" },
            database,
            version: env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}

/// `GET /api/metrics`
///
/// Prometheus text exposition. Admin only.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<String, ApiError> {
    Guard::for_actor(actor).require_admin()?;

    Ok(state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    ))
}
