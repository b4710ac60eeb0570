//! Drafts the lessons of one chapter and stores them with their resources.
//! Each call appends a fresh lesson set; existing lessons are left alone.

use std::sync::Arc;

use db::models::{
    chapter::Chapter,
    lesson::{CreateLesson, Lesson, LessonWithResources},
    lesson_resource::LessonResource,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    chapter_generator::parse_id,
    generation::{GenerationError, Stage, draft},
    generation_api::{GenerationApiClient, GenerationSettings},
    validation::{InputChecker, Invalid, LessonDraft, LessonSet, validate_lesson_set},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateLessonsRequest {
    pub chapter_id: String,
    pub chapter_title: String,
    pub chapter_description: Option<String>,
    pub chapter_order: Option<i32>,
    pub estimated_duration: Option<String>,
    pub course_name: String,
    pub level: Option<String>,
    pub language: Option<String>,
}

/// Request with every optional field resolved to its default.
#[derive(Debug, Clone)]
struct LessonBrief<'a> {
    chapter_title: &'a str,
    chapter_description: &'a str,
    chapter_order: i32,
    estimated_duration: &'a str,
    course_name: &'a str,
    level: &'a str,
    language: &'a str,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

impl GenerateLessonsRequest {
    fn validate(&self) -> Result<Uuid, GenerationError> {
        let mut checker = InputChecker::default();
        let chapter_id = parse_id(&mut checker, "chapterId", &self.chapter_id);
        checker
            .non_empty("chapterTitle", &self.chapter_title)
            .non_empty("courseName", &self.course_name);
        checker.finish().map_err(GenerationError::InvalidInput)?;
        chapter_id
            .ok_or_else(|| GenerationError::InvalidInput(Invalid::single("chapterId", "is required")))
    }

    fn brief(&self) -> LessonBrief<'_> {
        LessonBrief {
            chapter_title: &self.chapter_title,
            chapter_description: or_default(&self.chapter_description, ""),
            chapter_order: self.chapter_order.filter(|order| *order > 0).unwrap_or(1),
            estimated_duration: or_default(&self.estimated_duration, "1h"),
            course_name: &self.course_name,
            level: or_default(&self.level, "beginner"),
            language: or_default(&self.language, "en"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLessons {
    pub message: String,
    /// The validated model output
    pub lessons: Vec<LessonDraft>,
    /// Rows written for this call, each with the resources inserted alongside it
    pub stored_lessons: Vec<LessonWithResources>,
}

pub struct LessonGenerator {
    pool: SqlitePool,
    settings: Arc<GenerationSettings>,
}

impl LessonGenerator {
    pub fn new(pool: SqlitePool, settings: Arc<GenerationSettings>) -> Self {
        Self { pool, settings }
    }

    pub async fn generate(
        &self,
        request: &GenerateLessonsRequest,
    ) -> Result<GeneratedLessons, GenerationError> {
        let chapter_id = request.validate()?;
        let client = GenerationApiClient::from_settings(&self.settings)?;

        if Chapter::find_by_id(&self.pool, chapter_id).await?.is_none() {
            return Err(GenerationError::NotFound("Chapter"));
        }

        let brief = request.brief();
        info!(
            %chapter_id,
            chapter = %brief.chapter_title,
            course = %brief.course_name,
            "starting lesson generation"
        );

        let prompt = lessons_prompt(&brief);
        let LessonSet { lessons } =
            draft(&client, Stage::Lessons, &prompt, validate_lesson_set).await?;

        let mut tx = self.pool.begin().await?;
        let mut stored_lessons = Vec::with_capacity(lessons.len());
        for (index, lesson) in lessons.iter().enumerate() {
            let data = to_create_lesson(chapter_id, lesson, index);
            if data.lesson_type.carries_content() && data.content.is_none() {
                warn!(lesson_id = %lesson.lesson_id, lesson_type = %data.lesson_type, "lesson has no content");
            }

            let row = Lesson::create(&mut *tx, &data, Uuid::new_v4()).await?;
            let resources = match &lesson.resources {
                Some(resources) => LessonResource::create_many(&mut *tx, row.id, resources).await?,
                None => Vec::new(),
            };
            stored_lessons.push(LessonWithResources {
                lesson: row,
                resources,
            });
        }
        tx.commit().await?;

        info!(%chapter_id, stored = stored_lessons.len(), "stored generated lessons");
        Ok(GeneratedLessons {
            message: format!(
                "Successfully generated {} lessons for chapter: {}",
                stored_lessons.len(),
                brief.chapter_title
            ),
            lessons,
            stored_lessons,
        })
    }
}

/// Sequence position for a lesson: the leading number after the first "." of its
/// id ("2.3" -> 3), or its 1-based position when the id has no usable suffix.
pub fn lesson_order(lesson_id: &str, index: usize) -> i32 {
    let fallback = i32::try_from(index + 1).unwrap_or(i32::MAX);
    let Some(suffix) = lesson_id.split('.').nth(1) else {
        return fallback;
    };
    let digits: String = suffix
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(fallback)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn to_create_lesson(chapter_id: Uuid, lesson: &LessonDraft, index: usize) -> CreateLesson {
    CreateLesson {
        chapter_id,
        title: lesson.title.clone(),
        lesson_type: lesson.lesson_type,
        description: Some(lesson.description.clone()),
        duration: Some(lesson.duration.clone()),
        video_url: non_empty(&lesson.video_url),
        content: non_empty(&lesson.content),
        order: lesson_order(&lesson.lesson_id, index),
    }
}

fn lessons_prompt(brief: &LessonBrief<'_>) -> String {
    format!(
        r#"You are an experienced teacher writing the lessons for one chapter of a course.

## Course
- Name: {course}
- Level: {level}
- Language: {language}

## Chapter {order}: {title}
- Description: {description}
- Estimated Duration: {duration}

## Output Format
Return ONLY a JSON object of this shape:
{{
  "lessons": [
    {{
      "lessonId": "{order}.1",
      "title": "Lesson title",
      "type": "video | article | quiz | assignment",
      "duration": "e.g. 15m",
      "description": "One or two sentences on what the lesson covers",
      "content": "Markdown body for article and assignment lessons (optional)",
      "videoUrl": "Video link for video lessons (optional)",
      "resources": [
        {{ "title": "Resource title", "url": "https://example.com", "type": "pdf | link | doc | image" }}
      ]
    }}
  ]
}}

## Instructions
- Write 3-6 lessons whose durations add up to about {duration}.
- Number lessons "{order}.1", "{order}.2" and so on.
- Pick each lesson type by intent: "video" explains a concept, "article" is reading
  material, "quiz" checks understanding, "assignment" is hands-on practice.
- Give "article" and "assignment" lessons full markdown content.
- "video" lessons may carry a placeholder videoUrl or none at all.
- Attach 1-3 useful resources to a lesson where they help.
- Pitch the material at the {level} level.

Write all text in {language}."#,
        course = brief.course_name,
        level = brief.level,
        language = brief.language,
        order = brief.chapter_order,
        title = brief.chapter_title,
        description = brief.chapter_description,
        duration = brief.estimated_duration,
    )
}
