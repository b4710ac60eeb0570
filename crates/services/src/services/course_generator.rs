//! Drafts course metadata with the generation API and stores it as a course row.

use std::sync::Arc;

use db::models::course::{Course, CourseLevel, CreateCourse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::{
    generation::{GenerationError, Stage, draft, slugify},
    generation_api::{GenerationApiClient, GenerationSettings},
    validation::{CourseDraft, InputChecker, Invalid, validate_course_envelope},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateCourseRequest {
    pub category: String,
    pub topic: String,
    pub level: String,
    pub duration: String,
    pub no_of_chapters: i32,
    pub language: String,
}

impl GenerateCourseRequest {
    fn language(&self) -> &str {
        match self.language.trim() {
            "" => "en",
            language => language,
        }
    }

    fn validate(&self) -> Result<CourseLevel, GenerationError> {
        let mut checker = InputChecker::default();
        checker
            .non_empty("category", &self.category)
            .non_empty("topic", &self.topic)
            .non_empty("duration", &self.duration)
            .positive("noOfChapters", i64::from(self.no_of_chapters));
        let level = checker.one_of("level", &self.level, &CourseLevel::ALL);
        checker.finish().map_err(GenerationError::InvalidInput)?;
        level.ok_or_else(|| GenerationError::InvalidInput(Invalid::single("level", "is required")))
    }
}

pub struct CourseGenerator {
    pool: SqlitePool,
    settings: Arc<GenerationSettings>,
}

impl CourseGenerator {
    pub fn new(pool: SqlitePool, settings: Arc<GenerationSettings>) -> Self {
        Self { pool, settings }
    }

    /// Draft, validate and persist one course.
    pub async fn generate(&self, request: &GenerateCourseRequest) -> Result<Course, GenerationError> {
        let level = request.validate()?;
        let client = GenerationApiClient::from_settings(&self.settings)?;

        info!(
            category = %request.category,
            topic = %request.topic,
            %level,
            chapters = request.no_of_chapters,
            "starting course generation"
        );

        let prompt = course_prompt(request, level);
        let drafted = draft(&client, Stage::Course, &prompt, validate_course_envelope).await?;
        let data = apply_request(drafted, request, level);

        let course = Course::create(&self.pool, &data, Uuid::new_v4()).await?;
        info!(course_id = %course.id, name = %course.name, "stored generated course");
        Ok(course)
    }
}

/// The model's echo of the request parameters is not trusted: the caller's values
/// always win.
pub fn apply_request(drafted: CourseDraft, request: &GenerateCourseRequest, level: CourseLevel) -> CreateCourse {
    CreateCourse {
        name: drafted.name,
        subtitle: drafted.subtitle,
        description: drafted.description,
        banner_url: Some(drafted.course_banner),
        category: request.category.clone(),
        topic: request.topic.clone(),
        level,
        language: request.language().to_string(),
        prerequisites: drafted.prerequisites,
        learning_outcomes: drafted.learning_outcomes,
        duration: request.duration.clone(),
        no_of_chapters: request.no_of_chapters,
        publish: drafted.publish,
        include_certificate: drafted.include_certificate,
    }
}

fn course_prompt(request: &GenerateCourseRequest, level: CourseLevel) -> String {
    let banner = format!("/images/banners/{}-banner.jpg", slugify(&request.topic));
    let language = request.language();

    format!(
        r#"You are an expert instructional designer. Draft the overview metadata for a course.
Only describe the course as a whole; chapters and lessons are planned later.

## Course Parameters
- Category: {category}
- Topic: {topic}
- Level: {level} (one of "beginner", "intermediate", "advanced")
- Total Duration: {duration}
- Number of Chapters: {chapters}
- Language: {language}

## Output Format
Return ONLY a JSON object of this shape:
{{
  "course": {{
    "name": "Course name",
    "subtitle": "Short tagline (optional)",
    "description": "Course description",
    "category": "{category}",
    "topic": "{topic}",
    "level": "{level}",
    "language": "{language}",
    "prerequisites": "What learners should already know",
    "learningOutcomes": ["outcome 1", "outcome 2"],
    "duration": "{duration}",
    "noOfChapters": {chapters},
    "publish": false,
    "includeCertificate": false,
    "courseBanner": "{banner}"
  }}
}}

## Instructions
- Give the course a concise, professional name and an optional catchy subtitle.
- Write a 200-300 word description of what learners will achieve.
- List 5-8 concrete learning outcomes, phrased as skills learners will have.
- Write prerequisites as plain text ("None" is fine for beginner courses).
- Set "publish" to true for intermediate and advanced courses, false for beginner ones.
- Set "includeCertificate" to true when the course runs longer than 4 hours.
- Pitch every field at the requested level:
  - beginner: no prior knowledge, focus on fundamentals
  - intermediate: basic knowledge assumed, build practical skills
  - advanced: solid foundation assumed, cover complex topics and best practices

Write all text in {language}."#,
        category = request.category,
        topic = request.topic,
        level = level,
        duration = request.duration,
        chapters = request.no_of_chapters,
        language = language,
        banner = banner,
    )
}
