//! Client for the OpenAI-compatible chat completions API that drafts course content.

use std::sync::Arc;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Sampling temperature used for every generation call.
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Error)]
pub enum GenerationApiError {
    #[error("Missing GROQ_API_KEY environment variable")]
    MissingApiKey,
    #[error("network error: {0}")]
    Transport(String),
    #[error("Generation API error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("unreadable generation API response: {0}")]
    Serde(String),
    #[error("generation API returned no content")]
    EmptyResponse,
}

/// Where and how to reach the generation API. The key is optional so that
/// read-only deployments can start without one.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub api_key: Option<Arc<SecretString>>,
    pub base_url: String,
    pub model: String,
}

impl GenerationSettings {
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Arc::new(SecretString::from(key)));
        let base_url = std::env::var("GENERATION_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GENERATION_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            api_key,
            base_url,
            model,
        }
    }

    pub fn chat_completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationApiClient {
    http: Client,
    api_key: Arc<SecretString>,
    endpoint: String,
    model: String,
}

impl GenerationApiClient {
    /// Build a client, failing fast when no API key is configured.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self, GenerationApiError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(GenerationApiError::MissingApiKey)?;

        let http = Client::builder()
            .user_agent(concat!("course-studio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenerationApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            endpoint: settings.chat_completions_endpoint(),
            model: settings.model.clone(),
        })
    }

    /// Send one user prompt in JSON mode and return the first choice's text.
    pub async fn complete_json(&self, prompt: &str) -> Result<String, GenerationApiError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![Message::user(prompt)],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: TEMPERATURE,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "calling generation API");

        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationApiError::Transport(e.to_string()))?;

        let status = res.status();
        let raw = res
            .text()
            .await
            .map_err(|e| GenerationApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| raw.clone())
            });
            error!(status = status.as_u16(), message = %message, "generation API call failed");
            return Err(GenerationApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let response: ChatCompletionResponse =
            serde_json::from_str(&raw).map_err(|e| GenerationApiError::Serde(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationApiError::EmptyResponse)
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?.to_owned();
    Some(message)
}

/// Body of a reply that arrived wrapped in one markdown code fence, such as
/// "```json\n{...}\n```". `None` when the reply is not fenced as a whole.
pub fn strip_code_fence(text: &str) -> Option<&str> {
    let body = text.trim().strip_prefix("```")?.strip_suffix("```")?;
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    Some(body.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_reply_is_unwrapped() {
        let reply = "```json\n{\"lessons\": []}\n```";
        assert_eq!(strip_code_fence(reply), Some(r#"{"lessons": []}"#));
        assert_eq!(strip_code_fence("```\n{\"chapters\": []}\n```"), Some(r#"{"chapters": []}"#));
    }

    #[test]
    fn fences_inside_a_document_are_left_alone() {
        let reply = r#"{"content": "```python\nprint('hi')\n```"}"#;
        assert_eq!(strip_code_fence(reply), None);
        assert_eq!(strip_code_fence("Here you go:\n```json\n{}\n```"), None);
    }

    #[test]
    fn missing_key_is_a_configuration_failure() {
        let settings = GenerationSettings {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        };
        let err = GenerationApiClient::from_settings(&settings).unwrap_err();
        assert!(matches!(err, GenerationApiError::MissingApiKey));
        assert_eq!(err.to_string(), "Missing GROQ_API_KEY environment variable");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let settings = GenerationSettings {
            api_key: None,
            base_url: "http://127.0.0.1:9999/v1/".to_string(),
            model: DEFAULT_MODEL.to_string(),
        };
        assert_eq!(
            settings.chat_completions_endpoint(),
            "http://127.0.0.1:9999/v1/chat/completions"
        );
    }

    #[test]
    fn upstream_error_message_is_forwarded() {
        let raw = r#"{"error": {"message": "model overloaded", "type": "server_error"}}"#;
        assert_eq!(parse_error_message(raw).as_deref(), Some("model overloaded"));
        assert_eq!(parse_error_message("<html>"), None);
    }

    #[test]
    fn request_body_asks_for_json_mode_at_fixed_temperature() {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL,
            messages: vec![Message::user("hi")],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: TEMPERATURE,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "user");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }
}
