//! Upload metadata database operations
//!
//! Rows describe files attached to a wireframe page. The bytes themselves
//! live under the uploads directory, keyed by `stored_name`.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One stored upload
#[derive(Debug, Clone, Serialize)]
pub struct Upload {
    pub guid: Uuid,
    pub wireframe_id: Uuid,
    /// Client-supplied file name
    pub file_name: String,
    /// Server-side name under the uploads directory
    pub stored_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

fn row_to_upload(row: &sqlx::sqlite::SqliteRow) -> Result<Upload> {
    let guid_str: String = row.get("guid");
    let wireframe_str: String = row.get("wireframe_id");
    let created_str: String = row.get("created_at");

    Ok(Upload {
        guid: Uuid::parse_str(&guid_str)
            .map_err(|e| Error::Internal(format!("bad guid in uploads table: {}", e)))?,
        wireframe_id: Uuid::parse_str(&wireframe_str)
            .map_err(|e| Error::Internal(format!("bad wireframe_id in uploads table: {}", e)))?,
        file_name: row.get("file_name"),
        stored_name: row.get("stored_name"),
        content_type: row.get("content_type"),
        size_bytes: row.get("size_bytes"),
        created_at: DateTime::parse_from_rfc3339(&created_str)
            .map_err(|e| Error::Internal(format!("bad created_at in uploads table: {}", e)))?
            .with_timezone(&Utc),
    })
}

/// Record a stored upload
pub async fn create(pool: &SqlitePool, upload: &Upload) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO uploads (guid, wireframe_id, file_name, stored_name, content_type, size_bytes, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(upload.guid.to_string())
    .bind(upload.wireframe_id.to_string())
    .bind(&upload.file_name)
    .bind(&upload.stored_name)
    .bind(&upload.content_type)
    .bind(upload.size_bytes)
    .bind(upload.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// List uploads attached to a wireframe page, newest first
pub async fn list_for_wireframe(pool: &SqlitePool, wireframe_id: Uuid) -> Result<Vec<Upload>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, wireframe_id, file_name, stored_name, content_type, size_bytes, created_at
        FROM uploads
        WHERE wireframe_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(wireframe_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_upload).collect()
}

/// Load one upload by guid
pub async fn get(pool: &SqlitePool, guid: Uuid) -> Result<Option<Upload>> {
    let row = sqlx::query(
        r#"
        SELECT guid, wireframe_id, file_name, stored_name, content_type, size_bytes, created_at
        FROM uploads
        WHERE guid = ?
        "#,
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_upload).transpose()
}

/// Delete an upload row. Returns true when a row was removed.
pub async fn delete(pool: &SqlitePool, guid: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM uploads WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
