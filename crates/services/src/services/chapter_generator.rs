//! Drafts a chapter outline for an existing course. Only the chapter rows are
//! stored; the lesson sketches inside the outline are returned to the caller and
//! left for the lesson pipeline to fill in.

use std::sync::Arc;

use db::models::{
    chapter::{Chapter, CreateChapter},
    course::Course,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    generation::{GenerationError, Stage, draft},
    generation_api::{GenerationApiClient, GenerationSettings},
    validation::{ChapterDraft, ChapterOutline, InputChecker, Invalid, validate_chapter_outline},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateChaptersRequest {
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub learning_outcomes: Vec<String>,
    pub duration: String,
    pub no_of_chapters: i32,
    pub level: String,
    pub language: String,
}

impl GenerateChaptersRequest {
    fn validate(&self) -> Result<Uuid, GenerationError> {
        let mut checker = InputChecker::default();
        checker
            .non_empty("title", &self.title)
            .positive("noOfChapters", i64::from(self.no_of_chapters));
        let course_id = parse_id(&mut checker, "courseId", &self.course_id);
        checker.finish().map_err(GenerationError::InvalidInput)?;
        course_id.ok_or_else(|| GenerationError::InvalidInput(Invalid::single("courseId", "is required")))
    }
}

/// Parse a UUID path/body field, recording an issue when it is missing or malformed.
pub(crate) fn parse_id(checker: &mut InputChecker, field: &str, raw: &str) -> Option<Uuid> {
    if raw.trim().is_empty() {
        checker.push(field, "is required");
        return None;
    }
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            checker.push(field, "must be a valid UUID");
            None
        }
    }
}

/// The validated outline, lesson sketches included
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedChapters {
    pub chapters: Vec<ChapterDraft>,
}

pub struct ChapterGenerator {
    pool: SqlitePool,
    settings: Arc<GenerationSettings>,
}

impl ChapterGenerator {
    pub fn new(pool: SqlitePool, settings: Arc<GenerationSettings>) -> Self {
        Self { pool, settings }
    }

    pub async fn generate(
        &self,
        request: &GenerateChaptersRequest,
    ) -> Result<GeneratedChapters, GenerationError> {
        let course_id = request.validate()?;
        let client = GenerationApiClient::from_settings(&self.settings)?;

        if !Course::exists(&self.pool, course_id).await? {
            return Err(GenerationError::NotFound("Course"));
        }

        info!(
            %course_id,
            title = %request.title,
            chapters = request.no_of_chapters,
            "starting chapter generation"
        );

        let prompt = chapters_prompt(request);
        let ChapterOutline { chapters } =
            draft(&client, Stage::Chapters, &prompt, validate_chapter_outline).await?;

        if chapters.len() != request.no_of_chapters as usize {
            warn!(
                %course_id,
                requested = request.no_of_chapters,
                received = chapters.len(),
                "model returned a different number of chapters than requested"
            );
        }

        let mut tx = self.pool.begin().await?;
        for chapter in &chapters {
            Chapter::create(&mut *tx, &to_create_chapter(course_id, chapter), Uuid::new_v4())
                .await?;
        }
        tx.commit().await?;

        info!(%course_id, stored = chapters.len(), "stored generated chapters");
        Ok(GeneratedChapters { chapters })
    }
}

fn to_create_chapter(course_id: Uuid, draft: &ChapterDraft) -> CreateChapter {
    CreateChapter {
        course_id,
        title: draft.title.clone(),
        description: Some(draft.description.clone()),
        estimated_duration: Some(draft.estimated_duration.clone()),
        order: draft.chapter_id,
    }
}

fn chapters_prompt(request: &GenerateChaptersRequest) -> String {
    let outcomes = if request.learning_outcomes.is_empty() {
        "(none listed)".to_string()
    } else {
        request.learning_outcomes.join("; ")
    };
    let language = match request.language.trim() {
        "" => "en",
        language => language,
    };

    format!(
        r#"You are a curriculum architect. Split the course below into a chapter outline.

## Course
- Title: {title}
- Description: {description}
- Learning Outcomes: {outcomes}
- Total Duration: {duration}
- Number of Chapters: {chapters}
- Level: {level}
- Language: {language}

## Output Format
Return ONLY a JSON object of this shape:
{{
  "chapters": [
    {{
      "chapterId": 1,
      "title": "Chapter title",
      "description": "50-100 word overview of the chapter",
      "estimatedDuration": "e.g. 1h 15m",
      "lessons": [
        {{
          "lessonId": "1.1",
          "title": "Lesson title",
          "type": "video | article | quiz | assignment",
          "duration": "e.g. 15m",
          "description": "One or two sentences on what the lesson covers"
        }}
      ]
    }}
  ]
}}

## Instructions
- Produce exactly {chapters} chapters, numbered from 1, each building on the last.
- Give every chapter 3-6 lessons, numbered "<chapterId>.<lessonNumber>".
- Choose each lesson type by intent:
  - "video" explains a concept
  - "article" is reading or notes
  - "quiz" checks knowledge
  - "assignment" is practice or project work
- Balance chapter durations so they add up to roughly {duration}.
- Match the depth to the level: beginners get fundamentals, intermediate learners
  get hands-on practice, advanced learners get deep dives and best practices.

Write all text in {language}."#,
        title = request.title,
        description = request.description,
        outcomes = outcomes,
        duration = request.duration,
        chapters = request.no_of_chapters,
        level = request.level,
        language = language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateChaptersRequest {
        GenerateChaptersRequest {
            course_id: Uuid::new_v4().to_string(),
            title: "Python From Zero".to_string(),
            description: "A gentle start.".to_string(),
            learning_outcomes: vec!["Write loops".to_string(), "Read files".to_string()],
            duration: "4 hours".to_string(),
            no_of_chapters: 3,
            level: "beginner".to_string(),
            language: String::new(),
        }
    }

    #[test]
    fn chapter_order_comes_from_chapter_id() {
        let course_id = Uuid::new_v4();
        let draft = ChapterDraft {
            chapter_id: 4,
            title: "Files".to_string(),
            description: "Reading and writing".to_string(),
            estimated_duration: "50m".to_string(),
            lessons: Vec::new(),
        };
        let create = to_create_chapter(course_id, &draft);
        assert_eq!(create.order, 4);
        assert_eq!(create.course_id, course_id);
        assert_eq!(create.estimated_duration.as_deref(), Some("50m"));
    }

    #[test]
    fn bad_course_id_is_rejected_before_anything_else() {
        let mut req = request();
        req.course_id = "not-a-uuid".to_string();
        let Err(GenerationError::InvalidInput(invalid)) = req.validate() else {
            panic!("expected invalid input");
        };
        assert_eq!(invalid.issues()[0].path, "courseId");
        assert_eq!(invalid.issues()[0].message, "must be a valid UUID");
    }

    #[test]
    fn zero_chapters_is_invalid() {
        let mut req = request();
        req.no_of_chapters = 0;
        assert!(matches!(req.validate(), Err(GenerationError::InvalidInput(_))));
    }

    #[test]
    fn prompt_asks_for_the_requested_chapter_count() {
        let prompt = chapters_prompt(&request());
        assert!(prompt.contains("Produce exactly 3 chapters"));
        assert!(prompt.contains("Write loops; Read files"));
        assert!(prompt.contains("Write all text in en."));
    }
}
