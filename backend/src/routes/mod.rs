//! Route definitions for the Tangyuling API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Trash prediction
        .nest("/trash", trash_routes())
}

/// Trash prediction routes (public)
fn trash_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", get(handlers::get_predict))
        .route("/beach", get(handlers::get_beach_predictions))
}
