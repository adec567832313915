//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the gateway router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/command", post(handlers::command))
        .route("/ir", post(handlers::direct))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
