use axum::Router;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub mod chapters;
pub mod courses;
pub mod health;
pub mod lessons;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(courses::router())
        .merge(chapters::router())
        .merge(lessons::router())
}

/// Parse an id taken from the query string.
pub(crate) fn parse_uuid(name: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("{name} must be a valid UUID")))
}

/// A required query parameter, blank counting as missing.
pub(crate) fn required_id(name: &str, raw: Option<&str>) -> Result<Uuid, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse_uuid(name, raw),
        None => Err(ApiError::BadRequest(format!(
            "{name} query parameter is required"
        ))),
    }
}
