use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::lesson::LessonWithResources;
use serde::{Deserialize, Serialize};
use services::services::{
    catalog::Catalog,
    lesson_generator::{GenerateLessonsRequest, GeneratedLessons, LessonGenerator},
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::required_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonQuery {
    pub chapter_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LessonsBody {
    pub lessons: Vec<LessonWithResources>,
}

/// POST /generate-lessons
/// Draft and store the lessons of one chapter. Calling it again appends another set.
pub async fn generate_lessons(
    State(state): State<AppState>,
    payload: Result<axum::Json<GenerateLessonsRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<GeneratedLessons>>, ApiError> {
    let axum::Json(request) = payload?;
    let generator = LessonGenerator::new(state.db.pool.clone(), state.generation.clone());

    let generated = generator.generate(&request).await?;

    Ok(ResponseJson(ApiResponse::success(generated)))
}

/// GET /lesson?chapterId=
/// Lessons of a chapter, each with its resources
pub async fn get_lessons(
    State(state): State<AppState>,
    query: Result<Query<LessonQuery>, QueryRejection>,
) -> Result<ResponseJson<ApiResponse<LessonsBody>>, ApiError> {
    let Query(query) = query?;
    let chapter_id = required_id("chapterId", query.chapter_id.as_deref())?;

    let lessons = Catalog::new(state.db.pool.clone())
        .lessons_with_resources(chapter_id)
        .await?;

    Ok(ResponseJson(ApiResponse::success(LessonsBody { lessons })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-lessons", post(generate_lessons))
        .route("/lesson", get(get_lessons))
}
