use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    catalog::CatalogError, generation::GenerationError, generation_api::GenerationApiError,
};
use thiserror::Error;
use tracing::{error, warn};
use utils::response::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message.clone()))
            }
            ApiError::Catalog(CatalogError::NotFound(what)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(format!("{what} not found")),
            ),
            ApiError::Catalog(CatalogError::Database(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Failed to read from the database"),
            ),
            ApiError::Generation(err) => generation_failure(err),
        }
    }
}

fn generation_failure(err: &GenerationError) -> (StatusCode, ErrorResponse) {
    match err {
        GenerationError::InvalidInput(invalid) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::with_details("Invalid request", invalid.issues().to_vec()),
        ),
        GenerationError::InvalidOutput(invalid) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::with_details(
                "Generated content has an invalid structure",
                invalid.issues().to_vec(),
            ),
        ),
        GenerationError::NotFound(what) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(format!("{what} not found")),
        ),
        GenerationError::GenerationApi(GenerationApiError::MissingApiKey) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(err.to_string()),
        ),
        GenerationError::GenerationApi(_) | GenerationError::MalformedOutput(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(format!("Failed to generate content: {err}")),
        ),
        GenerationError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Failed to store generated content"),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}
