use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use service_core::error::AppError;

use crate::services::metrics::get_metrics;
use crate::startup::AppState;

pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.db.health_check().await?;
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": "invoice-service",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

pub async fn metrics() -> impl IntoResponse {
    get_metrics()
}
