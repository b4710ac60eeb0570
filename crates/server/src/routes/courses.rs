use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::course::Course;
use serde::{Deserialize, Serialize};
use services::services::{
    catalog::Catalog,
    course_generator::{CourseGenerator, GenerateCourseRequest},
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::parse_uuid};

#[derive(Debug, Serialize)]
pub struct CourseBody {
    pub course: Course,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CourseLookup {
    One { course: Course },
    All { courses: Vec<Course> },
}

#[derive(Debug, Deserialize)]
pub struct CourseQuery {
    pub id: Option<String>,
}

/// POST /generate-course
/// Draft course metadata with the generation API and store it
pub async fn generate_course(
    State(state): State<AppState>,
    payload: Result<axum::Json<GenerateCourseRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<CourseBody>>, ApiError> {
    let axum::Json(request) = payload?;
    let generator = CourseGenerator::new(state.db.pool.clone(), state.generation.clone());

    let course = generator.generate(&request).await?;

    Ok(ResponseJson(ApiResponse::success(CourseBody { course })))
}

/// GET /course?id=
/// One course when `id` is given, otherwise every course
pub async fn get_course(
    State(state): State<AppState>,
    query: Result<Query<CourseQuery>, QueryRejection>,
) -> Result<ResponseJson<ApiResponse<CourseLookup>>, ApiError> {
    let Query(query) = query?;
    let catalog = Catalog::new(state.db.pool.clone());

    let lookup = match query.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(raw) => CourseLookup::One {
            course: catalog.course(parse_uuid("id", raw)?).await?,
        },
        None => CourseLookup::All {
            courses: catalog.courses().await?,
        },
    };

    Ok(ResponseJson(ApiResponse::success(lookup)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-course", post(generate_course))
        .route("/course", get(get_course))
}
