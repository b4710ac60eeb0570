use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use uuid::Uuid;

use super::lesson::Lesson;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: Uuid,
    pub course_id: Uuid, // Foreign key to Course
    pub title: String,
    pub description: Option<String>,
    pub estimated_duration: Option<String>,
    pub order: i32, // 1-based position within the course
}

/// A chapter together with its lessons, both sorted by `order`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterWithLessons {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub lessons: Vec<Lesson>,
}

impl ChapterWithLessons {
    /// A chapter counts as populated once it has at least one lesson.
    pub fn is_populated(&self) -> bool {
        !self.lessons.is_empty()
    }
}

impl std::ops::Deref for ChapterWithLessons {
    type Target = Chapter;
    fn deref(&self) -> &Self::Target {
        &self.chapter
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapter {
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub estimated_duration: Option<String>,
    pub order: i32,
}

impl Chapter {
    pub async fn create<'e, E>(executor: E, data: &CreateChapter, id: Uuid) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Chapter>(
            r#"INSERT INTO chapters (id, course_id, title, description, estimated_duration, "order")
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING id, course_id, title, description, estimated_duration, "order""#,
        )
        .bind(id)
        .bind(data.course_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.estimated_duration)
        .bind(data.order)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chapter>(
            r#"SELECT id, course_id, title, description, estimated_duration, "order"
               FROM chapters
               WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_course_id(
        pool: &SqlitePool,
        course_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chapter>(
            r#"SELECT id, course_id, title, description, estimated_duration, "order"
               FROM chapters
               WHERE course_id = ?
               ORDER BY "order" ASC"#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }
}
