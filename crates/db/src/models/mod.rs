pub mod chapter;
pub mod course;
pub mod lesson;
pub mod lesson_resource;
