//! Upload endpoints
//!
//! Files attach to a catalog page. Bytes land in the uploads directory under
//! a server-assigned name; the row keeps the client's original file name.
//! Stored bytes are served back at /uploads/<stored_name>.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{api::parse_guid, ApiError, ApiResult, AppState};
use redline_common::db::uploads::{self, Upload};
use redline_common::db::wireframes;

/// GET /api/wireframes/:id/uploads
pub async fn list_uploads(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Upload>>> {
    let wireframe_id = parse_guid(&id)?;

    if wireframes::get(&state.db, wireframe_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("wireframe {}", id)));
    }

    let list = uploads::list_for_wireframe(&state.db, wireframe_id).await?;
    Ok(Json(list))
}

/// POST /api/wireframes/:id/uploads
///
/// Expects a multipart body with a `file` field.
pub async fn create_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Upload>)> {
    let wireframe_id = parse_guid(&id)?;

    if wireframes::get(&state.db, wireframe_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("wireframe {}", id)));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("bad multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(String::from)
            .unwrap_or_else(|| "upload.bin".to_string());
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("bad multipart body: {}", e)))?;

        // Server-side name is a fresh guid keeping the client extension
        let guid = Uuid::new_v4();
        let stored_name = match std::path::Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
        {
            Some(ext) => format!("{}.{}", guid, ext),
            None => guid.to_string(),
        };

        tokio::fs::write(state.uploads_dir.join(&stored_name), &data).await?;

        let upload = Upload {
            guid,
            wireframe_id,
            file_name,
            stored_name,
            content_type,
            size_bytes: data.len() as i64,
            created_at: Utc::now(),
        };
        uploads::create(&state.db, &upload).await?;

        info!(
            "Upload {} ({} bytes) attached to wireframe {}",
            upload.guid, upload.size_bytes, id
        );
        return Ok((StatusCode::CREATED, Json(upload)));
    }

    Err(ApiError::BadRequest(
        "multipart field 'file' missing".to_string(),
    ))
}

/// DELETE /api/uploads/:id
///
/// Removes the metadata row; stored bytes are removed best-effort.
pub async fn delete_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let guid = parse_guid(&id)?;

    let Some(upload) = uploads::get(&state.db, guid).await? else {
        return Err(ApiError::NotFound(format!("upload {}", id)));
    };

    uploads::delete(&state.db, guid).await?;

    let path = state.uploads_dir.join(&upload.stored_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Could not remove stored file {}: {}", path.display(), e);
    }

    info!("Upload {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
