//! Health endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::services::health_service::{check_health, HealthReport};
use crate::state::AppState;

/// `GET /health`: 200 when serving, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = check_health(&state.db).await;

    let status = if report.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
