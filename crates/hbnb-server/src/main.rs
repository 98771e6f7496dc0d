use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hbnb_core::{MemoryStore, Storage, TokenIssuer};
use hbnb_db::{Database, DatabaseConfig};
use hbnb_server::config::{ServerConfig, StorageKind};
use hbnb_server::routes;
use hbnb_server::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hbnb=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl);

    tracing::info!(storage = %config.storage, "Selected storage backend");

    match config.storage {
        StorageKind::Db => {
            let db = Database::open(&DatabaseConfig::from_env()?).await?;
            serve(&config, db.store(), tokens).await
        }
        StorageKind::Memory => serve(&config, MemoryStore::new(), tokens).await,
    }
}

async fn serve<S: Storage>(
    config: &ServerConfig,
    store: S,
    tokens: TokenIssuer,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState { store, tokens });

    let app = routes::router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.addr();
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
