//! HTTP API handlers

pub mod comments;
pub mod health;
pub mod uploads;
pub mod wireframes;

use crate::ApiError;
use uuid::Uuid;

/// Parse a path parameter as a guid, reporting 400 on garbage input
pub(crate) fn parse_guid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid id: {}", raw)))
}
