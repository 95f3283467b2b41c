pub mod handlers;
pub mod origin;
pub mod routes;
mod state;

pub use state::AppState;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;

use crate::common::RelayConfig;
use crate::store::SessionUploadStore;

/// Build the shared state for `config`, creating the upload root if needed
pub async fn build_state(config: RelayConfig) -> Result<AppState> {
    let store = SessionUploadStore::open(&config.upload_root, &config.default_extension)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload root {}",
                config.upload_root.display()
            )
        })?;

    Ok(AppState::new(store, config))
}

/// Run the relay until ctrl-c
pub async fn start_server(config: RelayConfig) -> Result<()> {
    let addr = config.bind_addr();
    let state = build_state(config).await?;
    let app = routes::create_router(&state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let port = listener.local_addr()?.port();

    tracing::info!(
        upload_root = %state.store.root().display(),
        "Server running on http://localhost:{}",
        port
    );
    tracing::info!(
        "Open http://localhost:{}/create-session to create a session ID",
        port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        // never resolve; server keeps running without graceful shutdown
        std::future::pending::<()>().await;
    }
}
