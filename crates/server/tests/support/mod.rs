//! In-process stand-in for the chat completions API plus request helpers.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use db::DBService;
use secrecy::SecretString;
use serde_json::{Value, json};
use server::{AppState, create_router};
use services::services::generation_api::GenerationSettings;
use tower::util::ServiceExt;

/// What the stub answers to the next completion request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this text as `choices[0].message.content`
    Content(String),
    /// Non-success status with `{"error": {"message": ...}}`
    Error(u16, String),
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Self::Content(value.to_string())
    }
}

#[derive(Clone, Default)]
pub struct StubApi {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl StubApi {
    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Bodies of every completion request received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn complete(State(stub): State<StubApi>, Json(body): Json<Value>) -> Response {
    stub.requests.lock().unwrap().push(body);
    let reply = stub.replies.lock().unwrap().pop_front();
    match reply {
        Some(Reply::Content(content)) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        Some(Reply::Error(status, message)) => (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({"error": {"message": message, "type": "test_error"}})),
        )
            .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "stub has no reply queued"}})),
        )
            .into_response(),
    }
}

/// Serve the stub on an ephemeral port and return its base URL.
pub async fn spawn_stub(stub: StubApi) -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(complete))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

pub struct TestApp {
    pub router: Router,
    pub db: DBService,
    pub stub: StubApi,
}

impl TestApp {
    /// Router backed by an in-memory database and a running stub API.
    pub async fn new() -> Self {
        let stub = StubApi::default();
        let base_url = spawn_stub(stub.clone()).await;
        Self::with_settings(
            stub,
            GenerationSettings {
                api_key: Some(Arc::new(SecretString::from("test-key".to_string()))),
                base_url,
                model: "test-model".to_string(),
            },
        )
        .await
    }

    /// Router whose generation settings carry no API key.
    pub async fn without_api_key() -> Self {
        let stub = StubApi::default();
        let base_url = spawn_stub(stub.clone()).await;
        Self::with_settings(
            stub,
            GenerationSettings {
                api_key: None,
                base_url,
                model: "test-model".to_string(),
            },
        )
        .await
    }

    async fn with_settings(stub: StubApi, settings: GenerationSettings) -> Self {
        let db = DBService::new_in_memory().await.unwrap();
        let router = create_router(AppState::new(db.clone(), settings));
        Self { router, db, stub }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Body::empty()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Body::from(body.to_string()))
            .await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Body::from(body)).await
    }

    async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

pub fn course_request() -> Value {
    json!({
        "category": "Programming",
        "topic": "intro to python",
        "level": "beginner",
        "duration": "4 hours",
        "noOfChapters": 5,
        "language": "en"
    })
}

/// A course draft whose echoed parameters disagree with `course_request`.
pub fn course_reply() -> Value {
    json!({
        "course": {
            "name": "Python From Zero",
            "subtitle": "Write your first scripts",
            "description": "A gentle start to programming with Python.",
            "category": "Data Science",
            "topic": "pandas",
            "level": "advanced",
            "language": "fr",
            "prerequisites": "None",
            "learningOutcomes": ["Install Python", "Write loops", "Read files"],
            "duration": "40 hours",
            "noOfChapters": 12,
            "publish": false,
            "includeCertificate": false,
            "courseBanner": "/images/banners/intro-to-python-banner.jpg"
        }
    })
}

pub fn chapters_reply() -> Value {
    json!({
        "chapters": [
            {
                "chapterId": 2,
                "title": "Control Flow",
                "description": "Branches and loops",
                "estimatedDuration": "1h",
                "lessons": [
                    {"lessonId": "2.1", "title": "If", "type": "video", "duration": "15m", "description": "Branching"}
                ]
            },
            {
                "chapterId": 1,
                "title": "Getting Started",
                "description": "Installing Python",
                "estimatedDuration": "45m",
                "lessons": [
                    {"lessonId": "1.1", "title": "Install", "type": "video", "duration": "10m", "description": "Setup"},
                    {"lessonId": "1.2", "title": "REPL", "type": "article", "duration": "10m", "description": "First steps"}
                ]
            }
        ]
    })
}

pub fn lessons_reply() -> Value {
    json!({
        "lessons": [
            {
                "lessonId": "1.2",
                "title": "Variables",
                "type": "article",
                "description": "Naming values",
                "duration": "15m",
                "content": "# Variables\nA variable names a value.",
                "resources": [
                    {"title": "Docs", "url": "https://docs.python.org/3/", "type": "link"},
                    {"title": "Cheat sheet", "url": "https://example.com/cheat.pdf", "type": "pdf"}
                ]
            },
            {
                "lessonId": "1.1",
                "title": "Hello World",
                "type": "video",
                "description": "Your first program",
                "duration": "10m",
                "videoUrl": ""
            },
            {
                "lessonId": "recap",
                "title": "Check yourself",
                "type": "quiz",
                "description": "Short quiz",
                "duration": "5m"
            }
        ]
    })
}
