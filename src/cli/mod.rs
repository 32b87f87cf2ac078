pub mod args;
pub mod prompt;

pub use args::Args;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::interface::QueryStore;
use crate::store::SqliteStore;
use crate::web::{AppState, build_router, app::cors_layer};

/// Parse the command line, open the database, and serve until shutdown
pub async fn run() -> Result<()> {
    let args = Args::parse();

    let cwd = std::env::current_dir().context("cannot read current directory")?;
    let path = args.database_path(&cwd)?;

    if !path.exists() {
        let question = format!(
            "The database {} does not exist and will be created.",
            path.display()
        );
        if !args.yes && !prompt::confirm(&question).await? {
            info!("database creation declined, exiting");
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let store_config = args.store_config(&path);
    let store = SqliteStore::open(&store_config)
        .await
        .with_context(|| format!("failed to open database {}", path.display()))?;

    serve(args.server_config(), Arc::new(store.clone())).await?;

    store.close().await;
    Ok(())
}

/// Bind the configured address and serve batches from `store`
pub async fn serve(config: ServerConfig, store: Arc<dyn QueryStore>) -> Result<()> {
    config.validate().map_err(|e| anyhow!(e))?;

    let cors = cors_layer(&config.origins).map_err(|e| anyhow!(e))?;
    let state = AppState::new(store)
        .locator(config.locator())
        .request_timeout(config.request_timeout);
    let app = build_router(state, cors);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "server is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down");
}
