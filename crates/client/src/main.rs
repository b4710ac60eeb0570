use std::{future::Future, time::Duration};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use strum_macros::Display;
use uuid::Uuid;

use crate::{
    api::StudioClient,
    models::{Chapter, Course, GenerateChapters, GenerateCourse, GenerateLessons},
    page::PageState,
};

mod api;
mod models;
mod page;
mod views;

#[derive(Clone, Copy, Debug, Default, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Parser)]
#[command(name = "course-client")]
#[command(about = "Browse and generate courses on a course studio server")]
struct Cli {
    /// Base URL of the course studio server
    #[arg(long, env = "COURSE_STUDIO_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// How many times a failed page may be retried (each retry asks first)
    #[arg(long, default_value_t = 0, global = true)]
    retry: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every course
    Courses,
    /// Show one course with its chapters and lessons
    Course { id: Uuid },
    /// Show one lesson in full: its content or video and its resources
    Lesson {
        lesson_id: Uuid,
        /// Chapter the lesson belongs to
        #[arg(long)]
        chapter: Uuid,
        /// Course the chapter belongs to
        #[arg(long)]
        course: Uuid,
    },
    /// Generate and store a new course
    GenerateCourse {
        #[arg(long)]
        category: String,
        #[arg(long)]
        topic: String,
        #[arg(long, value_enum, default_value_t = Level::Beginner)]
        level: Level,
        /// Total duration, e.g. "4 hours"
        #[arg(long)]
        duration: String,
        #[arg(long, default_value_t = 5)]
        chapters: i32,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// List the stored lessons of one chapter with their resources
    Lessons { chapter_id: Uuid },
    /// Generate the chapter outline of an existing course
    GenerateChapters { course_id: Uuid },
    /// Generate the lessons of one chapter
    GenerateLessons {
        chapter_id: Uuid,
        /// Course the chapter belongs to
        #[arg(long)]
        course: Uuid,
        /// Generate even though the chapter already has lessons (appends a second set)
        #[arg(long)]
        force: bool,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Drive one page to `Loaded`, offering up to `retries` manual retries on failure.
async fn load_page<T, F, Fut>(label: &str, retries: u32, mut fetch: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, api::ClientError>>,
{
    let mut page = PageState::Idle;
    let mut attempts_left = retries;

    loop {
        let spinner = create_spinner(label);
        page.load(&mut fetch).await?;
        spinner.finish_and_clear();

        if page.data().is_some() {
            break;
        }
        if let Some(error) = page.error() {
            eprintln!("error: {error}");
        }
        if attempts_left == 0 || !page.can_retry() || !confirm_retry() {
            break;
        }
        attempts_left -= 1;
    }

    if let Some(error) = page.error() {
        bail!("{label} failed: {error}");
    }
    match page.into_data() {
        Some(data) => Ok(data),
        None => bail!("{label} did not complete"),
    }
}

fn confirm_retry() -> bool {
    Confirm::new()
        .with_prompt("Retry?")
        .default(false)
        .interact()
        .unwrap_or(false)
}

async fn course_with_chapters(
    client: &StudioClient,
    course_id: Uuid,
    retries: u32,
) -> Result<(Course, Vec<Chapter>)> {
    let course = load_page("Loading course", retries, move || async move {
        client.course(course_id).await.map(|body| body.course)
    })
    .await?;
    let chapters = load_page("Loading chapters", retries, move || async move {
        client.chapters(course_id).await.map(|body| body.chapters)
    })
    .await?;
    Ok((course, chapters))
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::logging::init("warn")?;
    let cli = Cli::parse();
    let client = &StudioClient::new(&cli.server)?;
    let retries = cli.retry;

    match cli.command {
        Command::Courses => {
            let courses = load_page("Loading courses", retries, move || async move {
                client.courses().await.map(|body| body.courses)
            })
            .await?;
            views::print_course_list(&courses);
        }
        Command::Course { id } => {
            let (course, chapters) = course_with_chapters(client, id, retries).await?;
            views::print_course(&course, &chapters);
        }
        Command::Lessons { chapter_id } => {
            let lessons = load_page("Loading lessons", retries, move || async move {
                client.lessons(chapter_id).await.map(|body| body.lessons)
            })
            .await?;
            if lessons.is_empty() {
                println!("No lessons stored for chapter {chapter_id}.");
            }
            views::print_lessons(&lessons);
        }
        Command::Lesson {
            lesson_id,
            chapter: chapter_id,
            course,
        } => {
            let (course, chapters) = course_with_chapters(client, course, retries).await?;
            let Some(chapter) = chapters.iter().find(|c| c.id == chapter_id) else {
                bail!("chapter {chapter_id} is not part of course {}", course.id);
            };
            let lessons = load_page("Loading lesson", retries, move || async move {
                client.lessons(chapter_id).await.map(|body| body.lessons)
            })
            .await?;
            let Some(lesson) = lessons.iter().find(|l| l.id == lesson_id) else {
                bail!("Lesson not found");
            };
            views::print_lesson(&course, chapter, lesson);
        }
        Command::GenerateCourse {
            category,
            topic,
            level,
            duration,
            chapters,
            language,
        } => {
            let request = &GenerateCourse {
                category,
                topic,
                level: level.to_string(),
                duration,
                no_of_chapters: chapters,
                language,
            };
            let course = load_page("Generating course", retries, move || async move {
                client.generate_course(request).await.map(|body| body.course)
            })
            .await?;
            views::print_course(&course, &[]);
        }
        Command::GenerateChapters { course_id } => {
            let course = load_page("Loading course", retries, move || async move {
                client.course(course_id).await.map(|body| body.course)
            })
            .await?;
            let request = &GenerateChapters::for_course(&course);
            let outline = load_page("Generating chapters", retries, move || async move {
                client
                    .generate_chapters(request)
                    .await
                    .map(|body| body.chapters)
            })
            .await?;
            views::print_outline(&course, &outline);
        }
        Command::GenerateLessons {
            chapter_id,
            course,
            force,
        } => {
            let (course, chapters) = course_with_chapters(client, course, retries).await?;
            let Some(chapter) = chapters.iter().find(|c| c.id == chapter_id) else {
                bail!("chapter {chapter_id} is not part of course {}", course.id);
            };
            if chapter.is_populated() && !force {
                bail!(
                    "chapter \"{}\" already has {} lessons; pass --force to append another set",
                    chapter.title,
                    chapter.lessons.len()
                );
            }

            let request = &GenerateLessons::for_chapter(&course, chapter);
            let generated = load_page("Generating lessons", retries, move || async move {
                client.generate_lessons(request).await
            })
            .await?;
            println!("{}", generated.message);
            views::print_lessons(&generated.stored_lessons);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_sent_in_lowercase() {
        assert_eq!(Level::default().to_string(), "beginner");
        assert_eq!(Level::Intermediate.to_string(), "intermediate");
        assert_eq!(Level::Advanced.to_string(), "advanced");
    }
}
