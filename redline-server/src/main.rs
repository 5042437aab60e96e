//! Redline - wireframe design-review backend
//!
//! Serves the wireframe catalog, positioned review comments, and file
//! uploads over HTTP. Before the listener binds, the catalog is
//! synchronized against the CSV source of truth according to the configured
//! policy; a failed sync is logged and the service starts with whatever
//! catalog state already exists.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redline_common::config::{self, RootFolder, SyncPolicy};
use redline_common::db::init_database;
use redline_common::sync;
use redline_server::{build_router, AppState};

/// Command-line arguments for redline-server
#[derive(Parser, Debug)]
#[command(name = "redline-server")]
#[command(about = "Wireframe design-review backend")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "REDLINE_PORT")]
    port: u16,

    /// Root folder holding the database and uploads directory
    #[arg(short, long, env = "REDLINE_ROOT")]
    root_folder: Option<PathBuf>,

    /// Catalog source location (CSV)
    #[arg(short, long, env = "REDLINE_SOURCE")]
    source: Option<PathBuf>,

    /// When to synchronize the catalog against the source at startup
    #[arg(long, value_enum, default_value = "when-empty", env = "REDLINE_SYNC_POLICY")]
    sync_policy: SyncPolicy,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redline=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Redline backend v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root = RootFolder::new(config::resolve_root_folder(args.root_folder.as_deref()));
    root.ensure_directories()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", root.path().display());

    let db_path = root.database_path();
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    // Catalog synchronization runs before the listener binds, so request
    // handlers never race the reconciler
    let source_path = config::resolve_source_location(args.source.as_deref());
    info!("Catalog source: {}", source_path.display());
    sync::sync_at_startup(&pool, &source_path, args.sync_policy).await;

    let state = AppState::new(pool.clone(), root.uploads_dir());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("redline-server listening on http://{}", addr);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Best-effort resource release; never blocks process exit
    sync::shutdown(pool).await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
