use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use super::lesson_resource::LessonResource;

/// Kind of lesson, chosen by pedagogical intent
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[sqlx(type_name = "lesson_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LessonType {
    /// Conceptual explainer
    Video,
    /// Reading or notes; carries markdown content
    Article,
    /// Knowledge check
    Quiz,
    /// Practice or project work
    Assignment,
}

impl LessonType {
    pub const ALL: [LessonType; 4] = [
        LessonType::Video,
        LessonType::Article,
        LessonType::Quiz,
        LessonType::Assignment,
    ];

    /// Whether `content` is meaningful for this kind of lesson.
    pub fn carries_content(&self) -> bool {
        matches!(self, LessonType::Article | LessonType::Assignment)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    pub chapter_id: Uuid, // Foreign key to Chapter
    pub title: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub video_url: Option<String>,
    pub content: Option<String>, // markdown for articles and assignments
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonWithResources {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub resources: Vec<LessonResource>,
}

impl std::ops::Deref for LessonWithResources {
    type Target = Lesson;
    fn deref(&self) -> &Self::Target {
        &self.lesson
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLesson {
    pub chapter_id: Uuid,
    pub title: String,
    pub lesson_type: LessonType,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub video_url: Option<String>,
    pub content: Option<String>,
    pub order: i32,
}

impl Lesson {
    pub async fn create<'e, E>(executor: E, data: &CreateLesson, id: Uuid) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Lesson>(
            r#"INSERT INTO lessons (id, chapter_id, title, type, description, duration, video_url, content, "order")
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING id, chapter_id, title, type, description, duration, video_url, content, "order""#,
        )
        .bind(id)
        .bind(data.chapter_id)
        .bind(&data.title)
        .bind(data.lesson_type)
        .bind(&data.description)
        .bind(&data.duration)
        .bind(&data.video_url)
        .bind(&data.content)
        .bind(data.order)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_chapter_id(
        pool: &SqlitePool,
        chapter_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            r#"SELECT id, chapter_id, title, type, description, duration, video_url, content, "order"
               FROM lessons
               WHERE chapter_id = ?
               ORDER BY "order" ASC, rowid ASC"#,
        )
        .bind(chapter_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_chapter_id(pool: &SqlitePool, chapter_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE chapter_id = ?")
            .bind(chapter_id)
            .fetch_one(pool)
            .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(pool)
            .await
    }
}
