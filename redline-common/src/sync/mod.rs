//! Catalog synchronization
//!
//! Reconciles the persisted wireframe catalog against an external CSV source
//! of truth. The pipeline is additive-only: it inserts catalog entries whose
//! identity tuple is missing and never touches existing rows, because
//! comments and uploads hold durable references into the catalog.
//!
//! The pipeline runs once at process startup, before the HTTP listener
//! binds, so it needs no locking against request handlers. Failures are
//! logged and swallowed: an empty or stale catalog is preferable to a
//! service that refuses to start.

pub mod reconcile;
pub mod source;

pub use reconcile::reconcile;
pub use source::{load_source, SourceRecord};

use crate::config::SyncPolicy;
use crate::db::wireframes;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{error, info};

/// Load the source and reconcile the catalog against it.
///
/// Returns the number of catalog entries inserted.
pub async fn run_sync(pool: &SqlitePool, source_path: &Path) -> crate::Result<u64> {
    let records = source::load_source(source_path)?;
    reconcile::reconcile(pool, &records).await
}

/// Startup hook: synchronize the catalog according to the configured policy.
///
/// Never fails. Source or storage errors are logged and the service comes up
/// with whatever catalog state already exists.
pub async fn sync_at_startup(pool: &SqlitePool, source_path: &Path, policy: SyncPolicy) {
    let run = match policy {
        SyncPolicy::Always => true,
        SyncPolicy::WhenEmpty => match wireframes::count(pool).await {
            Ok(0) => {
                info!("Catalog is empty, importing from {}", source_path.display());
                true
            }
            Ok(n) => {
                info!("Catalog already holds {} entries, skipping import", n);
                false
            }
            Err(e) => {
                error!("Could not read catalog size, skipping import: {}", e);
                false
            }
        },
    };

    if !run {
        return;
    }

    match run_sync(pool, source_path).await {
        Ok(inserted) => info!("Catalog sync complete: {} new entries", inserted),
        Err(e) => error!("Catalog sync failed, continuing with existing catalog: {}", e),
    }
}

/// Shutdown hook: release the connection pool.
///
/// Best-effort only; must never block or fail process exit.
pub async fn shutdown(pool: SqlitePool) {
    pool.close().await;
    info!("Database connection pool closed");
}
