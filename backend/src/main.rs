//! Tangyuling API server

use std::net::SocketAddr;

use tangyuling_backend::{
    config::Config, create_app, scheduler::BeachCollector, AppState, TrashService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tangyuling_server=debug,tangyuling_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Tangyuling Server");
    tracing::info!("Environment: {}", config.environment);

    if config.khoa.api_key.is_none() {
        tracing::warn!("KHOA API key is not set; predictions will fail until it is configured");
    }
    if config.model.path.is_none() {
        tracing::warn!("Model path is not set; predictions will fail until it is configured");
    }

    let trash = TrashService::from_config(&config)?;

    if config.scheduler.enabled {
        BeachCollector::new(trash.clone(), config.scheduler.clone()).spawn()?;
    }

    // Create application state
    let state = AppState { trash };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
