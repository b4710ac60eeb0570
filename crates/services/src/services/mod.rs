pub mod catalog;
pub mod chapter_generator;
pub mod course_generator;
pub mod generation;
pub mod generation_api;
pub mod lesson_generator;
pub mod validation;
