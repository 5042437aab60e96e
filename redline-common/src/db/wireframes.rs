//! Wireframe catalog database operations
//!
//! The catalog is the set of known wireframe pages. Rows are created only by
//! the reconciler; comments and uploads hold foreign keys into this table,
//! so nothing here ever updates or deletes a row.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;

/// The logical identity of a wireframe page.
///
/// Two catalog rows with the same tuple are the same page regardless of guid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub project: String,
    pub device: String,
    pub page_name: String,
    pub page_path: String,
}

/// One wireframe catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct Wireframe {
    pub guid: Uuid,
    pub project: String,
    pub device: String,
    pub page_name: String,
    pub page_path: String,
    pub created_at: DateTime<Utc>,
}

impl Wireframe {
    /// Create a new catalog entry with a fresh guid
    pub fn new(project: String, device: String, page_name: String, page_path: String) -> Self {
        Self {
            guid: Uuid::new_v4(),
            project,
            device,
            page_name,
            page_path,
            created_at: Utc::now(),
        }
    }

    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            project: self.project.clone(),
            device: self.device.clone(),
            page_name: self.page_name.clone(),
            page_path: self.page_path.clone(),
        }
    }
}

fn row_to_wireframe(row: &sqlx::sqlite::SqliteRow) -> Result<Wireframe> {
    let guid_str: String = row.get("guid");
    let guid = Uuid::parse_str(&guid_str)
        .map_err(|e| Error::Internal(format!("bad guid in wireframes table: {}", e)))?;

    let created_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| Error::Internal(format!("bad created_at in wireframes table: {}", e)))?
        .with_timezone(&Utc);

    Ok(Wireframe {
        guid,
        project: row.get("project"),
        device: row.get("device"),
        page_name: row.get("page_name"),
        page_path: row.get("page_path"),
        created_at,
    })
}

/// Count catalog entries
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wireframes")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Look up one catalog entry by its identity tuple
pub async fn find_by_identity(pool: &SqlitePool, key: &IdentityKey) -> Result<Option<Wireframe>> {
    let row = sqlx::query(
        r#"
        SELECT guid, project, device, page_name, page_path, created_at
        FROM wireframes
        WHERE project = ? AND device = ? AND page_name = ? AND page_path = ?
        "#,
    )
    .bind(&key.project)
    .bind(&key.device)
    .bind(&key.page_name)
    .bind(&key.page_path)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_wireframe).transpose()
}

/// Load one catalog entry by guid
pub async fn get(pool: &SqlitePool, guid: Uuid) -> Result<Option<Wireframe>> {
    let row = sqlx::query(
        "SELECT guid, project, device, page_name, page_path, created_at \
         FROM wireframes WHERE guid = ?",
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_wireframe).transpose()
}

/// List catalog entries, optionally filtered by project and/or device
pub async fn list(
    pool: &SqlitePool,
    project: Option<&str>,
    device: Option<&str>,
) -> Result<Vec<Wireframe>> {
    // Equality filters only; empty string is a valid filter value
    let rows = sqlx::query(
        r#"
        SELECT guid, project, device, page_name, page_path, created_at
        FROM wireframes
        WHERE (? IS NULL OR project = ?)
          AND (? IS NULL OR device = ?)
        ORDER BY project, device, page_name
        "#,
    )
    .bind(project)
    .bind(project)
    .bind(device)
    .bind(device)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_wireframe).collect()
}

/// Load the identity tuples of every catalog row.
///
/// Runs on the caller's connection so the reconciler can read it inside the
/// same transaction that performs its inserts.
pub async fn load_identity_set(conn: &mut SqliteConnection) -> Result<HashSet<IdentityKey>> {
    let rows = sqlx::query("SELECT project, device, page_name, page_path FROM wireframes")
        .fetch_all(conn)
        .await?;

    Ok(rows
        .iter()
        .map(|row| IdentityKey {
            project: row.get("project"),
            device: row.get("device"),
            page_name: row.get("page_name"),
            page_path: row.get("page_path"),
        })
        .collect())
}

/// Insert a batch of new catalog entries on the caller's connection.
///
/// Returns the number of rows written. Commit/rollback is the caller's job.
pub async fn insert_batch(conn: &mut SqliteConnection, entries: &[Wireframe]) -> Result<u64> {
    let mut written = 0u64;

    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO wireframes (guid, project, device, page_name, page_path, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.guid.to_string())
        .bind(&entry.project)
        .bind(&entry.device)
        .bind(&entry.page_name)
        .bind(&entry.page_path)
        .bind(entry.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;

        written += 1;
    }

    Ok(written)
}
