mod handler;
mod process;

use std::sync::Arc;

use convert_core::{ObjectStore, StorageProxyClient};
use tracing_subscriber::EnvFilter;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 接続設定は起動時に一度だけ解決する
    let storage_client = StorageProxyClient::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "failed to load storage connection");
    })?;

    let state = AppState {
        store: Arc::new(storage_client),
    };

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "convert-processor listening");

    axum::serve(listener, handler::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
