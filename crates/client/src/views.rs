use crate::models::{Chapter, Course, Lesson, OutlineChapter};

pub fn print_course_list(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses yet. Create one with `course-client generate-course`.");
        return;
    }
    for course in courses {
        println!(
            "{}  {} [{} · {} · {} chapters]",
            course.id, course.name, course.level, course.duration, course.no_of_chapters
        );
    }
}

pub fn print_course(course: &Course, chapters: &[Chapter]) {
    println!("{}", course.name);
    if let Some(subtitle) = &course.subtitle {
        println!("{subtitle}");
    }
    println!(
        "\n{} / {} · {} · {} · {}",
        course.category, course.topic, course.level, course.duration, course.language
    );
    println!("\n{}", course.description);

    if !course.learning_outcomes.is_empty() {
        println!("\nYou will learn:");
        for outcome in &course.learning_outcomes {
            println!("  - {outcome}");
        }
    }
    if let Some(prerequisites) = &course.prerequisites {
        println!("\nPrerequisites: {prerequisites}");
    }

    if chapters.is_empty() {
        println!(
            "\nNo chapters yet. Run `course-client generate-chapters {}`.",
            course.id
        );
        return;
    }

    println!("\nChapters:");
    for chapter in chapters {
        print_chapter(course, chapter);
    }
}

fn print_chapter(course: &Course, chapter: &Chapter) {
    println!(
        "\n{}. {} ({})",
        chapter.order,
        chapter.title,
        chapter.estimated_duration.as_deref().unwrap_or("duration unknown")
    );
    match lesson_hint(course, chapter) {
        Some(hint) => println!("   {hint}"),
        None => {
            for lesson in &chapter.lessons {
                println!("   {}", lesson_line(lesson));
            }
        }
    }
}

/// Only chapters without lessons offer lesson generation.
pub fn lesson_hint(course: &Course, chapter: &Chapter) -> Option<String> {
    (!chapter.is_populated()).then(|| {
        format!(
            "no lessons yet: course-client generate-lessons {} --course {}",
            chapter.id, course.id
        )
    })
}

fn lesson_line(lesson: &Lesson) -> String {
    format!(
        "{}. [{}] {} ({})",
        lesson.order,
        lesson.lesson_type,
        lesson.title,
        lesson.duration.as_deref().unwrap_or("-")
    )
}

pub fn print_outline(course: &Course, outline: &[OutlineChapter]) {
    println!("Generated {} chapters for {}:", outline.len(), course.name);
    for chapter in outline {
        println!(
            "\n{}. {} ({})",
            chapter.chapter_id, chapter.title, chapter.estimated_duration
        );
        for lesson in &chapter.lessons {
            println!(
                "   {} [{}] {} ({})",
                lesson.lesson_id, lesson.lesson_type, lesson.title, lesson.duration
            );
        }
    }
    println!(
        "\nLesson sketches are not stored. Generate lessons per chapter from `course-client course {}`.",
        course.id
    );
}

pub fn print_lesson(course: &Course, chapter: &Chapter, lesson: &Lesson) {
    print!("{}", lesson_detail(course, chapter, lesson));
}

/// Full lesson page: course and chapter context, then the body for the lesson type.
pub fn lesson_detail(course: &Course, chapter: &Chapter, lesson: &Lesson) -> String {
    let mut out = format!(
        "{} / Chapter {}: {}\n\n{} [{}] ({})\n",
        course.name,
        chapter.order,
        chapter.title,
        lesson.title,
        lesson.lesson_type,
        lesson.duration.as_deref().unwrap_or("-")
    );
    if let Some(description) = &lesson.description {
        out.push_str(&format!("{description}\n"));
    }

    match lesson.lesson_type.as_str() {
        "video" => match &lesson.video_url {
            Some(url) => out.push_str(&format!("\nVideo: {url}\n")),
            None => out.push_str("\nNo video has been attached yet.\n"),
        },
        "quiz" => out.push_str("\nQuizzes cannot be taken from the command line yet.\n"),
        _ => match &lesson.content {
            Some(content) => out.push_str(&format!("\n{content}\n")),
            None => out.push_str("\nThis lesson has no written content.\n"),
        },
    }

    if !lesson.resources.is_empty() {
        out.push_str("\nResources:\n");
        for resource in &lesson.resources {
            out.push_str(&format!(
                "  - {} ({}) {}\n",
                resource.title, resource.resource_type, resource.url
            ));
        }
    }
    out
}

pub fn print_lessons(lessons: &[Lesson]) {
    for lesson in lessons {
        println!("{}  {}", lesson_line(lesson), lesson.id);
        for resource in &lesson.resources {
            println!("     {} <{}> ({})", resource.title, resource.url, resource.resource_type);
        }
    }
}
