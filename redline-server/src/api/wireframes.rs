//! Wireframe catalog endpoints (read-only)
//!
//! Catalog rows are created only by the startup sync pipeline; the API
//! exposes list and lookup.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::{api::parse_guid, ApiError, ApiResult, AppState};
use redline_common::db::wireframes::{self, Wireframe};

/// Optional equality filters for the catalog listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub project: Option<String>,
    pub device: Option<String>,
}

/// GET /api/wireframes?project=&device=
pub async fn list_wireframes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Wireframe>>> {
    let entries = wireframes::list(
        &state.db,
        query.project.as_deref(),
        query.device.as_deref(),
    )
    .await?;

    Ok(Json(entries))
}

/// GET /api/wireframes/:id
pub async fn get_wireframe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Wireframe>> {
    let guid = parse_guid(&id)?;

    let entry = wireframes::get(&state.db, guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("wireframe {}", id)))?;

    Ok(Json(entry))
}
