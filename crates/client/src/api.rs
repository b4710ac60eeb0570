use reqwest::{Client, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;
use utils::response::{ApiResponse, ErrorResponse, FieldIssue};
use uuid::Uuid;

use crate::models::{
    ChaptersBody, CourseBody, CoursesBody, GenerateChapters, GenerateCourse, GenerateLessons,
    GeneratedLessonsBody, LessonsBody, OutlineBody,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{}", describe(*status, message, details))]
    Api {
        status: StatusCode,
        message: String,
        details: Vec<FieldIssue>,
    },
}

fn describe(status: StatusCode, message: &str, details: &[FieldIssue]) -> String {
    let mut out = format!("{message} ({})", status.as_u16());
    for issue in details {
        out.push_str(&format!("\n  - {issue}"));
    }
    out
}

/// Thin typed wrapper over the course studio HTTP API.
#[derive(Debug, Clone)]
pub struct StudioClient {
    http: Client,
    base_url: String,
}

impl StudioClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("course-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        debug!(path, "GET");
        let res = self.http.get(self.url(path)).query(query).send().await?;
        decode(res).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        debug!(path, "POST");
        let res = self.http.post(self.url(path)).json(body).send().await?;
        decode(res).await
    }

    pub async fn courses(&self) -> Result<CoursesBody, ClientError> {
        self.get("/course", &[]).await
    }

    pub async fn course(&self, id: Uuid) -> Result<CourseBody, ClientError> {
        self.get("/course", &[("id", id.to_string())]).await
    }

    pub async fn chapters(&self, course_id: Uuid) -> Result<ChaptersBody, ClientError> {
        self.get("/chapter", &[("courseId", course_id.to_string())])
            .await
    }

    pub async fn lessons(&self, chapter_id: Uuid) -> Result<LessonsBody, ClientError> {
        self.get("/lesson", &[("chapterId", chapter_id.to_string())])
            .await
    }

    pub async fn generate_course(&self, request: &GenerateCourse) -> Result<CourseBody, ClientError> {
        self.post("/generate-course", request).await
    }

    pub async fn generate_chapters(
        &self,
        request: &GenerateChapters,
    ) -> Result<OutlineBody, ClientError> {
        self.post("/generate-chapters", request).await
    }

    pub async fn generate_lessons(
        &self,
        request: &GenerateLessons,
    ) -> Result<GeneratedLessonsBody, ClientError> {
        self.post("/generate-lessons", request).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        let body: ApiResponse<T> = res.json().await?;
        return Ok(body.into_data());
    }

    let text = res.text().await?;
    let (message, details) = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => (body.error, body.details.unwrap_or_default()),
        Err(_) => (
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Vec::new(),
        ),
    };
    Err(ClientError::Api {
        status,
        message,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_lists_details() {
        let err = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid request".to_string(),
            details: vec![
                FieldIssue::new("topic", "is required"),
                FieldIssue::new("noOfChapters", "must be at least 1"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid request (400)\n  - topic: is required\n  - noOfChapters: must be at least 1"
        );
    }

    #[test]
    fn not_found_reports_status() {
        let err = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Course not found".to_string(),
            details: Vec::new(),
        };
        assert_eq!(err.to_string(), "Course not found (404)");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = StudioClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(client.url("/course"), "http://127.0.0.1:3000/course");
    }
}
