//! Wire shapes returned by the course studio server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub banner_url: Option<String>,
    pub category: String,
    pub topic: String,
    pub level: String,
    pub language: String,
    pub prerequisites: Option<String>,
    pub learning_outcomes: Vec<String>,
    pub duration: String,
    pub no_of_chapters: i32,
    pub publish: bool,
    pub include_certificate: bool,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub estimated_duration: Option<String>,
    pub order: i32,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Chapter {
    /// Lesson generation is only offered for chapters without lessons.
    pub fn is_populated(&self) -> bool {
        !self.lessons.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub video_url: Option<String>,
    pub content: Option<String>,
    pub order: i32,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineChapter {
    pub chapter_id: i32,
    pub title: String,
    pub estimated_duration: String,
    #[serde(default)]
    pub lessons: Vec<OutlineLesson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineLesson {
    pub lesson_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub duration: String,
}

#[derive(Debug, Deserialize)]
pub struct CourseBody {
    pub course: Course,
}

#[derive(Debug, Deserialize)]
pub struct CoursesBody {
    pub courses: Vec<Course>,
}

#[derive(Debug, Deserialize)]
pub struct ChaptersBody {
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize)]
pub struct OutlineBody {
    pub chapters: Vec<OutlineChapter>,
}

#[derive(Debug, Deserialize)]
pub struct LessonsBody {
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLessonsBody {
    pub message: String,
    pub stored_lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCourse {
    pub category: String,
    pub topic: String,
    pub level: String,
    pub duration: String,
    pub no_of_chapters: i32,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChapters {
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub learning_outcomes: Vec<String>,
    pub duration: String,
    pub no_of_chapters: i32,
    pub level: String,
    pub language: String,
}

impl GenerateChapters {
    pub fn for_course(course: &Course) -> Self {
        Self {
            course_id: course.id,
            title: course.name.clone(),
            description: course.description.clone(),
            learning_outcomes: course.learning_outcomes.clone(),
            duration: course.duration.clone(),
            no_of_chapters: course.no_of_chapters,
            level: course.level.clone(),
            language: course.language.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLessons {
    pub chapter_id: Uuid,
    pub chapter_title: String,
    pub chapter_description: Option<String>,
    pub chapter_order: i32,
    pub estimated_duration: Option<String>,
    pub course_name: String,
    pub level: String,
    pub language: String,
}

impl GenerateLessons {
    pub fn for_chapter(course: &Course, chapter: &Chapter) -> Self {
        Self {
            chapter_id: chapter.id,
            chapter_title: chapter.title.clone(),
            chapter_description: chapter.description.clone(),
            chapter_order: chapter.order,
            estimated_duration: chapter.estimated_duration.clone(),
            course_name: course.name.clone(),
            level: course.level.clone(),
            language: course.language.clone(),
        }
    }
}
