//! Bazaar media storage server
//!
//! Main entry point for the listing media and deletion service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_api::{AppState, create_router};
use bazaar_db::connect;
use bazaar_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar=debug,bazaar_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    let state = AppState::from_config(db, &config).context("invalid storage configuration")?;
    info!(
        base_url = %config.storage.base_url,
        evidence_bucket = %config.storage.evidence_bucket,
        max_retries = config.storage.max_retries,
        "Object store configured"
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
