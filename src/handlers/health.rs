use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::models::{HealthResponse, StoreHealth};

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Document store ping failed");
            false
        }
    };

    let status = if reachable { "healthy" } else { "degraded" };

    info!(status = status, backend = state.store.backend(), "Health check completed");

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        document_store: StoreHealth {
            backend: state.store.backend().to_string(),
            reachable,
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness check endpoint: ready once the document store answers.
pub async fn ready_handler(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.store.ping().await.map_err(|e| {
        info!(error = %e, "Readiness check failed - document store unavailable");
        AppError::service_unavailable("document store")
    })?;
    Ok(StatusCode::OK)
}
