//! Tangyuling - Jeju coastal debris prediction service
//!
//! Combines live tidal current and wind observations from KHOA with a
//! trained regression model to estimate marine debris on Jeju beaches.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::TrashService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub trash: TrashService,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
