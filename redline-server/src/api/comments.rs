//! Review comment endpoints
//!
//! Comments are positioned annotations on a catalog page. Positions are
//! normalized page coordinates in [0.0, 1.0]; out-of-range values are
//! rejected before they reach the schema CHECK.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::{api::parse_guid, ApiError, ApiResult, AppState};
use redline_common::db::comments::{self, Comment, CommentUpdate, NewComment};
use redline_common::db::wireframes;

/// Request payload for creating a comment
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub author: String,
    pub body: String,
    pub x: f64,
    pub y: f64,
}

/// Request payload for partially updating a comment
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCommentRequest {
    pub body: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub resolved: Option<bool>,
}

fn validate_position(x: f64, y: f64) -> Result<(), ApiError> {
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(ApiError::BadRequest(format!(
            "position ({}, {}) outside [0.0, 1.0]",
            x, y
        )));
    }
    Ok(())
}

/// GET /api/wireframes/:id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    let wireframe_id = parse_guid(&id)?;

    if wireframes::get(&state.db, wireframe_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("wireframe {}", id)));
    }

    let list = comments::list_for_wireframe(&state.db, wireframe_id).await?;
    Ok(Json(list))
}

/// POST /api/wireframes/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let wireframe_id = parse_guid(&id)?;
    validate_position(payload.x, payload.y)?;

    if payload.body.trim().is_empty() {
        return Err(ApiError::BadRequest("comment body cannot be empty".to_string()));
    }

    if wireframes::get(&state.db, wireframe_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("wireframe {}", id)));
    }

    let comment = comments::create(
        &state.db,
        NewComment {
            wireframe_id,
            author: payload.author,
            body: payload.body,
            x: payload.x,
            y: payload.y,
        },
    )
    .await?;

    info!("Comment {} created on wireframe {}", comment.guid, id);
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /api/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let guid = parse_guid(&id)?;

    validate_position(payload.x.unwrap_or(0.0), payload.y.unwrap_or(0.0))?;

    let updated = comments::update(
        &state.db,
        guid,
        CommentUpdate {
            body: payload.body,
            x: payload.x,
            y: payload.y,
            resolved: payload.resolved,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("comment {}", id)))?;

    Ok(Json(updated))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let guid = parse_guid(&id)?;

    if !comments::delete(&state.db, guid).await? {
        return Err(ApiError::NotFound(format!("comment {}", id)));
    }

    info!("Comment {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
