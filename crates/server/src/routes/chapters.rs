use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::chapter::ChapterWithLessons;
use serde::{Deserialize, Serialize};
use services::services::{
    catalog::Catalog,
    chapter_generator::{ChapterGenerator, GenerateChaptersRequest, GeneratedChapters},
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::required_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterQuery {
    pub course_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChaptersBody {
    pub chapters: Vec<ChapterWithLessons>,
}

/// POST /generate-chapters
/// Draft a chapter outline for a course and store the chapter rows
pub async fn generate_chapters(
    State(state): State<AppState>,
    payload: Result<axum::Json<GenerateChaptersRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<GeneratedChapters>>, ApiError> {
    let axum::Json(request) = payload?;
    let generator = ChapterGenerator::new(state.db.pool.clone(), state.generation.clone());

    let generated = generator.generate(&request).await?;

    Ok(ResponseJson(ApiResponse::success(generated)))
}

/// GET /chapter?courseId=
/// Chapters of a course, each with its lessons
pub async fn get_chapters(
    State(state): State<AppState>,
    query: Result<Query<ChapterQuery>, QueryRejection>,
) -> Result<ResponseJson<ApiResponse<ChaptersBody>>, ApiError> {
    let Query(query) = query?;
    let course_id = required_id("courseId", query.course_id.as_deref())?;

    let chapters = Catalog::new(state.db.pool.clone())
        .chapters_with_lessons(course_id)
        .await?;

    Ok(ResponseJson(ApiResponse::success(ChaptersBody { chapters })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-chapters", post(generate_chapters))
        .route("/chapter", get(get_chapters))
}
