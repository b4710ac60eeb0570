use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type, types::Json};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Target audience of a course
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, EnumString, Display, Default,
)]
#[sqlx(type_name = "course_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub const ALL: [CourseLevel; 3] = [
        CourseLevel::Beginner,
        CourseLevel::Intermediate,
        CourseLevel::Advanced,
    ];
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub banner_url: Option<String>,
    pub category: String,
    pub topic: String,
    pub level: CourseLevel,
    pub language: String,
    pub prerequisites: Option<String>,
    pub learning_outcomes: Json<Vec<String>>, // stored as JSON text
    pub duration: String,
    pub no_of_chapters: i32,
    pub publish: bool,
    pub include_certificate: bool,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    pub name: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub banner_url: Option<String>,
    pub category: String,
    pub topic: String,
    pub level: CourseLevel,
    pub language: String,
    pub prerequisites: Option<String>,
    pub learning_outcomes: Vec<String>,
    pub duration: String,
    pub no_of_chapters: i32,
    pub publish: bool,
    pub include_certificate: bool,
}

const COURSE_COLUMNS: &str = r#"id, name, subtitle, description, banner_url, category, topic, level,
    language, prerequisites, learning_outcomes, duration, no_of_chapters, publish,
    include_certificate, last_updated"#;

impl Course {
    pub async fn create<'e, E>(executor: E, data: &CreateCourse, id: Uuid) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            r#"INSERT INTO courses (id, name, subtitle, description, banner_url, category, topic,
                   level, language, prerequisites, learning_outcomes, duration, no_of_chapters,
                   publish, include_certificate, last_updated)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING {COURSE_COLUMNS}"#
        );
        sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(&data.name)
            .bind(&data.subtitle)
            .bind(&data.description)
            .bind(&data.banner_url)
            .bind(&data.category)
            .bind(&data.topic)
            .bind(data.level)
            .bind(&data.language)
            .bind(&data.prerequisites)
            .bind(Json(&data.learning_outcomes))
            .bind(&data.duration)
            .bind(data.no_of_chapters)
            .bind(data.publish)
            .bind(data.include_certificate)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?");
        sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every course, oldest first. Unfiltered and unpaginated.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY last_updated ASC");
        sqlx::query_as::<_, Course>(&sql).fetch_all(pool).await
    }

    pub async fn exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(pool)
            .await
    }
}
