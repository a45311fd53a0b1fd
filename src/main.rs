//! Cafefinder HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use cafefinder::config::Config;
use cafefinder::embedding::OpenAiEmbedder;
use cafefinder::gateway::{AppState, create_router_with_state};
use cafefinder::search::SearchEngine;
use cafefinder::session::SessionStore;
use cafefinder::store::LibsqlStore;
use cafefinder::vectordb::{DEFAULT_COLLECTION_NAME, DEFAULT_VECTOR_SIZE, QdrantIndex, VectorIndex};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "cafefinder starting"
    );

    let records = LibsqlStore::open(&config.database_path).await?;
    tracing::info!(path = %config.database_path.display(), "record store ready");

    let index = QdrantIndex::connect(
        &config.qdrant_url,
        DEFAULT_COLLECTION_NAME,
        DEFAULT_VECTOR_SIZE,
    )
    .await?;
    index.ensure_collection().await?;
    tracing::info!(url = %config.qdrant_url, "vector index ready");

    let embedder = OpenAiEmbedder::new(
        config.embedding_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
    );

    let sessions = Arc::new(SessionStore::new(Duration::seconds(config.session_ttl_secs)));

    let engine = Arc::new(SearchEngine::new(
        embedder.clone(),
        index.clone(),
        records.clone(),
        sessions,
        config.fusion_weights(),
    ));

    let state = AppState::new(engine, embedder, index, records);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("cafefinder shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
