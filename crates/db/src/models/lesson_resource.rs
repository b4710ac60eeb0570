use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[sqlx(type_name = "resource_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    Pdf,
    Link,
    Doc,
    Image,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Pdf,
        ResourceType::Link,
        ResourceType::Doc,
        ResourceType::Image,
    ];
}

/// Supplementary link or file attached to a lesson
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResource {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub title: String,
    pub url: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonResource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
}

impl LessonResource {
    /// Insert every resource for `lesson_id` with one multi-row statement.
    pub async fn create_many<'e, E>(
        executor: E,
        lesson_id: Uuid,
        resources: &[CreateLessonResource],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = sqlx::QueryBuilder::<Sqlite>::new(
            "INSERT INTO lesson_resources (id, lesson_id, title, url, type) ",
        );
        builder.push_values(resources, |mut row, resource| {
            row.push_bind(Uuid::new_v4())
                .push_bind(lesson_id)
                .push_bind(resource.title.clone())
                .push_bind(resource.url.clone())
                .push_bind(resource.resource_type);
        });
        builder.push(" RETURNING id, lesson_id, title, url, type");

        builder
            .build_query_as::<LessonResource>()
            .fetch_all(executor)
            .await
    }

    pub async fn find_by_lesson_id(
        pool: &SqlitePool,
        lesson_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, LessonResource>(
            r#"SELECT id, lesson_id, title, url, type
               FROM lesson_resources
               WHERE lesson_id = ?
               ORDER BY rowid ASC"#,
        )
        .bind(lesson_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM lesson_resources")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DBService,
        models::{
            chapter::{Chapter, CreateChapter},
            course::Course,
            lesson::{CreateLesson, Lesson, LessonType},
            test_support::sample_course,
        },
    };

    #[tokio::test]
    async fn create_many_inserts_all_rows_for_lesson() {
        let db = DBService::new_in_memory().await.unwrap();
        let course = Course::create(&db.pool, &sample_course(), Uuid::new_v4())
            .await
            .unwrap();
        let chapter = Chapter::create(
            &db.pool,
            &CreateChapter {
                course_id: course.id,
                title: "Basics".to_string(),
                description: None,
                estimated_duration: None,
                order: 1,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let lesson = Lesson::create(
            &db.pool,
            &CreateLesson {
                chapter_id: chapter.id,
                title: "Reading".to_string(),
                lesson_type: LessonType::Article,
                description: None,
                duration: None,
                video_url: None,
                content: None,
                order: 1,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let resources = vec![
            CreateLessonResource {
                title: "Docs".to_string(),
                url: "https://docs.python.org".to_string(),
                resource_type: ResourceType::Link,
            },
            CreateLessonResource {
                title: "Cheat sheet".to_string(),
                url: "https://example.com/cheat.pdf".to_string(),
                resource_type: ResourceType::Pdf,
            },
        ];
        let created = LessonResource::create_many(&db.pool, lesson.id, &resources)
            .await
            .unwrap();
        assert_eq!(created.len(), 2);

        let found = LessonResource::find_by_lesson_id(&db.pool, lesson.id).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|r| r.lesson_id == lesson.id));
        assert_eq!(found[0].title, "Docs");
        assert_eq!(found[1].resource_type, ResourceType::Pdf);
    }

    #[tokio::test]
    async fn create_many_with_nothing_is_a_no_op() {
        let db = DBService::new_in_memory().await.unwrap();
        let created = LessonResource::create_many(&db.pool, Uuid::new_v4(), &[])
            .await
            .unwrap();
        assert!(created.is_empty());
        assert_eq!(LessonResource::count_all(&db.pool).await.unwrap(), 0);
    }
}
