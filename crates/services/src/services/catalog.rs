//! Read side: courses, chapters with their lessons, lessons with their resources.

use db::models::{
    chapter::{Chapter, ChapterWithLessons},
    course::Course,
    lesson::{Lesson, LessonWithResources},
    lesson_resource::LessonResource,
};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
}

#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn course(&self, id: Uuid) -> Result<Course, CatalogError> {
        Course::find_by_id(&self.pool, id)
            .await?
            .ok_or(CatalogError::NotFound("Course"))
    }

    pub async fn courses(&self) -> Result<Vec<Course>, CatalogError> {
        Ok(Course::find_all(&self.pool).await?)
    }

    /// Chapters of a course by `order`, each with its lessons by `order`. An unknown
    /// course simply has no chapters.
    pub async fn chapters_with_lessons(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<ChapterWithLessons>, CatalogError> {
        let chapters = Chapter::find_by_course_id(&self.pool, course_id).await?;
        let mut out = Vec::with_capacity(chapters.len());
        // One lesson query per chapter; a join would replace this if lists grow.
        for chapter in chapters {
            let lessons = Lesson::find_by_chapter_id(&self.pool, chapter.id).await?;
            out.push(ChapterWithLessons { chapter, lessons });
        }
        Ok(out)
    }

    pub async fn lessons_with_resources(
        &self,
        chapter_id: Uuid,
    ) -> Result<Vec<LessonWithResources>, CatalogError> {
        let lessons = Lesson::find_by_chapter_id(&self.pool, chapter_id).await?;
        let mut out = Vec::with_capacity(lessons.len());
        for lesson in lessons {
            let resources = LessonResource::find_by_lesson_id(&self.pool, lesson.id).await?;
            out.push(LessonWithResources { lesson, resources });
        }
        Ok(out)
    }
}
