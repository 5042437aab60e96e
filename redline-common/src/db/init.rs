//! Database initialization
//!
//! Opens (or creates) the review database and brings the schema up to date.
//! Safe to call on every process start.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys (comments/uploads cascade on wireframe delete)
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    // Schema creation is idempotent - safe to call multiple times
    create_wireframes_table(&pool).await?;
    create_comments_table(&pool).await?;
    create_uploads_table(&pool).await?;

    Ok(pool)
}

/// Create the wireframes catalog table
///
/// The identity tuple (project, device, page_name, page_path) carries a
/// non-unique lookup index only. Duplicate prevention is performed by the
/// reconciler, not by a schema constraint.
async fn create_wireframes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS wireframes (
            guid TEXT PRIMARY KEY,
            project TEXT NOT NULL,
            device TEXT NOT NULL,
            page_name TEXT NOT NULL,
            page_path TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_wireframes_identity \
         ON wireframes(project, device, page_name, page_path)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the comments table
///
/// Positions are normalized page coordinates in [0.0, 1.0].
async fn create_comments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            guid TEXT PRIMARY KEY,
            wireframe_id TEXT NOT NULL REFERENCES wireframes(guid) ON DELETE CASCADE,
            author TEXT NOT NULL,
            body TEXT NOT NULL,
            x REAL NOT NULL,
            y REAL NOT NULL,
            resolved INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (x >= 0.0 AND x <= 1.0),
            CHECK (y >= 0.0 AND y <= 1.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_comments_wireframe ON comments(wireframe_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the uploads table
async fn create_uploads_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS uploads (
            guid TEXT PRIMARY KEY,
            wireframe_id TEXT NOT NULL REFERENCES wireframes(guid) ON DELETE CASCADE,
            file_name TEXT NOT NULL,
            stored_name TEXT NOT NULL,
            content_type TEXT,
            size_bytes INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (size_bytes >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_uploads_wireframe ON uploads(wireframe_id)")
        .execute(pool)
        .await?;

    Ok(())
}
