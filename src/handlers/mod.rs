pub mod documents;
pub mod health;

pub use documents::*;
pub use health::*;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::{AppError, AppResult};
use crate::middleware::logging_middleware;
use crate::store::DocumentStore;

/// Shared by every handler. The store is the only cross-request state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

pub fn create_router(state: AppState, cors_origin: &str, max_body_bytes: usize) -> AppResult<Router> {
    Ok(Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/data", post(save_document_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origin)?)
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        ))
}

fn cors_layer(origin: &str) -> AppResult<CorsLayer> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| AppError::config(format!("Invalid CORS origin '{}': {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(false))
}
