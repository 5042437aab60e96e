//! Review comment database operations
//!
//! Comments are positioned annotations on a wireframe page. Positions are
//! normalized page coordinates in [0.0, 1.0].

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One review comment
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub guid: Uuid,
    pub wireframe_id: Uuid,
    pub author: String,
    pub body: String,
    pub x: f64,
    pub y: f64,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub wireframe_id: Uuid,
    pub author: String,
    pub body: String,
    pub x: f64,
    pub y: f64,
}

/// Optional fields accepted when updating a comment
#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    pub body: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub resolved: Option<bool>,
}

fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("bad {} in comments table: {}", column, e)))
}

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    let guid_str: String = row.get("guid");
    let wireframe_str: String = row.get("wireframe_id");
    let created_str: String = row.get("created_at");
    let updated_str: String = row.get("updated_at");
    let resolved: i64 = row.get("resolved");

    Ok(Comment {
        guid: Uuid::parse_str(&guid_str)
            .map_err(|e| Error::Internal(format!("bad guid in comments table: {}", e)))?,
        wireframe_id: Uuid::parse_str(&wireframe_str)
            .map_err(|e| Error::Internal(format!("bad wireframe_id in comments table: {}", e)))?,
        author: row.get("author"),
        body: row.get("body"),
        x: row.get("x"),
        y: row.get("y"),
        resolved: resolved != 0,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

const SELECT_COLUMNS: &str =
    "guid, wireframe_id, author, body, x, y, resolved, created_at, updated_at";

/// List comments on a wireframe page, oldest first
pub async fn list_for_wireframe(pool: &SqlitePool, wireframe_id: Uuid) -> Result<Vec<Comment>> {
    let sql = format!(
        "SELECT {} FROM comments WHERE wireframe_id = ? ORDER BY created_at",
        SELECT_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(wireframe_id.to_string())
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_comment).collect()
}

/// Load one comment by guid
pub async fn get(pool: &SqlitePool, guid: Uuid) -> Result<Option<Comment>> {
    let sql = format!("SELECT {} FROM comments WHERE guid = ?", SELECT_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(guid.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_comment).transpose()
}

/// Create a comment and return the stored row
pub async fn create(pool: &SqlitePool, new: NewComment) -> Result<Comment> {
    let now = Utc::now();
    let comment = Comment {
        guid: Uuid::new_v4(),
        wireframe_id: new.wireframe_id,
        author: new.author,
        body: new.body,
        x: new.x,
        y: new.y,
        resolved: false,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO comments (guid, wireframe_id, author, body, x, y, resolved, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(comment.guid.to_string())
    .bind(comment.wireframe_id.to_string())
    .bind(&comment.author)
    .bind(&comment.body)
    .bind(comment.x)
    .bind(comment.y)
    .bind(comment.created_at.to_rfc3339())
    .bind(comment.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(comment)
}

/// Apply a partial update to a comment, returning the updated row.
///
/// Returns Ok(None) when the comment does not exist.
pub async fn update(
    pool: &SqlitePool,
    guid: Uuid,
    update: CommentUpdate,
) -> Result<Option<Comment>> {
    let Some(mut comment) = get(pool, guid).await? else {
        return Ok(None);
    };

    if let Some(body) = update.body {
        comment.body = body;
    }
    if let Some(x) = update.x {
        comment.x = x;
    }
    if let Some(y) = update.y {
        comment.y = y;
    }
    if let Some(resolved) = update.resolved {
        comment.resolved = resolved;
    }
    comment.updated_at = Utc::now();

    sqlx::query(
        "UPDATE comments SET body = ?, x = ?, y = ?, resolved = ?, updated_at = ? WHERE guid = ?",
    )
    .bind(&comment.body)
    .bind(comment.x)
    .bind(comment.y)
    .bind(comment.resolved as i64)
    .bind(comment.updated_at.to_rfc3339())
    .bind(guid.to_string())
    .execute(pool)
    .await?;

    Ok(Some(comment))
}

/// Delete a comment. Returns true when a row was removed.
pub async fn delete(pool: &SqlitePool, guid: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
