//! Shared plumbing for the course, chapter and lesson generation pipelines.

use serde_json::Value;
use strum_macros::Display;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::{
    generation_api::{GenerationApiClient, GenerationApiError},
    validation::{Invalid, parse_generated_json},
};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    GenerationApi(#[from] GenerationApiError),
    #[error("generated content is not valid JSON: {0}")]
    MalformedOutput(String),
    #[error("generated content does not match the expected structure: {0}")]
    InvalidOutput(Invalid),
    #[error("invalid request: {0}")]
    InvalidInput(Invalid),
    #[error("{0} not found")]
    NotFound(&'static str),
}

/// Which pipeline stage a draft belongs to; used for log fields.
#[derive(Debug, Clone, Copy, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Course,
    Chapters,
    Lessons,
}

/// Send `prompt`, parse the reply as JSON and run it through `validate`.
pub async fn draft<T>(
    client: &GenerationApiClient,
    stage: Stage,
    prompt: &str,
    validate: fn(&Value) -> Result<T, Invalid>,
) -> Result<T, GenerationError> {
    debug!(%stage, prompt_len = prompt.len(), "requesting draft");
    let text = client.complete_json(prompt).await?;

    let value = parse_generated_json(&text).map_err(|e| {
        error!(
            %stage,
            json_error = %e,
            response_preview = %text.chars().take(500).collect::<String>(),
            "generation response is not JSON"
        );
        GenerationError::MalformedOutput(e.to_string())
    })?;

    debug!(%stage, response = %value, "generation response received");

    validate(&value).map_err(|invalid| {
        warn!(%stage, issues = %invalid, "generation response failed validation");
        GenerationError::InvalidOutput(invalid)
    })
}

/// Collapse whitespace runs to `-` and lowercase, e.g. "Intro to  Python" -> "intro-to-python".
pub fn slugify(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
