//! Shape checks for generated documents and caller input.
//!
//! Every check collects all problems it finds instead of stopping at the first, so
//! callers can report the full list back in the error envelope. One validator per
//! entity (course, chapter, lesson, resource) is shared by every pipeline stage that
//! touches that entity.

use std::{fmt, str::FromStr};

use db::models::{
    lesson::LessonType,
    lesson_resource::{CreateLessonResource, ResourceType},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utils::response::FieldIssue;

use super::generation_api::strip_code_fence;

/// A document or request that failed one or more checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid(pub Vec<FieldIssue>);

impl Invalid {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldIssue::new(path, message)])
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for Invalid {}

/// Course metadata as drafted by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub name: String,
    pub subtitle: Option<String>,
    pub description: String,
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
    pub course_banner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterOutline {
    pub chapters: Vec<ChapterDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDraft {
    pub chapter_id: i32,
    pub title: String,
    pub description: String,
    pub estimated_duration: String,
    pub lessons: Vec<LessonOutline>,
}

/// Lesson sketch inside a chapter outline. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutline {
    pub lesson_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonSet {
    pub lessons: Vec<LessonDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub lesson_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub description: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<CreateLessonResource>>,
}

/// Parse model output text as JSON. A failure here is not a shape problem: the
/// model did not produce JSON at all.
///
/// JSON mode replies are parsed as they are; a reply wrapped in a single code
/// fence is unwrapped only when the raw text does not parse.
pub fn parse_generated_json(text: &str) -> Result<Value, serde_json::Error> {
    let text = text.trim();
    serde_json::from_str(text).or_else(|err| match strip_code_fence(text) {
        Some(body) => serde_json::from_str(body),
        None => Err(err),
    })
}

/// `{"course": {...}}`
pub fn validate_course_envelope(value: &Value) -> Result<CourseDraft, Invalid> {
    let mut c = Checker::default();
    let draft = c
        .object(value, "")
        .and_then(|root| c.required_object(root, "", "course"))
        .and_then(|course| c.course(course, "course"));
    c.finish(draft)
}

/// `{"chapters": [...]}`
pub fn validate_chapter_outline(value: &Value) -> Result<ChapterOutline, Invalid> {
    let mut c = Checker::default();
    let outline = c.object(value, "").and_then(|root| {
        let items = c.required_array(root, "", "chapters")?;
        let chapters = items
            .iter()
            .enumerate()
            .map(|(i, item)| c.chapter(item, &index("chapters", i)))
            .collect::<Vec<_>>();
        chapters
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .map(|chapters| ChapterOutline { chapters })
    });
    c.finish(outline)
}

/// A single lesson resource at `path`. Lesson validation runs every entry of a
/// lesson's `resources` through this check.
pub fn validate_resource(value: &Value, path: &str) -> Result<CreateLessonResource, Invalid> {
    let mut c = Checker::default();
    let resource = c.resource(value, path);
    c.finish(resource)
}

/// `{"lessons": [...]}`
pub fn validate_lesson_set(value: &Value) -> Result<LessonSet, Invalid> {
    let mut c = Checker::default();
    let set = c.object(value, "").and_then(|root| {
        let items = c.required_array(root, "", "lessons")?;
        let lessons = items
            .iter()
            .enumerate()
            .map(|(i, item)| c.lesson(item, &index("lessons", i)))
            .collect::<Vec<_>>();
        lessons
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .map(|lessons| LessonSet { lessons })
    });
    c.finish(set)
}

/// Collects issues for caller-supplied request fields.
#[derive(Debug, Default)]
pub struct InputChecker {
    issues: Vec<FieldIssue>,
}

impl InputChecker {
    pub fn non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.issues.push(FieldIssue::new(field, "is required"));
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: i64) -> &mut Self {
        if value < 1 {
            self.issues.push(FieldIssue::new(field, "must be at least 1"));
        }
        self
    }

    /// Parse `value` into `T`, recording an issue listing the allowed spellings.
    pub fn one_of<T>(&mut self, field: &str, value: &str, allowed: &[T]) -> Option<T>
    where
        T: FromStr + fmt::Display,
    {
        match value.trim().to_lowercase().parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.issues
                    .push(FieldIssue::new(field, expected_one_of(allowed)));
                None
            }
        }
    }

    pub fn push(&mut self, field: &str, message: &str) -> &mut Self {
        self.issues.push(FieldIssue::new(field, message));
        self
    }

    pub fn finish(self) -> Result<(), Invalid> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(Invalid(self.issues))
        }
    }
}

fn expected_one_of<T: fmt::Display>(allowed: &[T]) -> String {
    let names = allowed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("expected one of {names}")
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Default)]
struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn finish<T>(self, value: Option<T>) -> Result<T, Invalid> {
        match value {
            Some(value) if self.issues.is_empty() => Ok(value),
            _ if self.issues.is_empty() => Err(Invalid::single("", "document is empty")),
            _ => Err(Invalid(self.issues)),
        }
    }

    fn issue(&mut self, path: String, message: impl Into<String>) {
        self.issues.push(FieldIssue::new(path, message));
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.issue(
                    path.to_string(),
                    format!("expected object, received {}", type_name(other)),
                );
                None
            }
        }
    }

    fn field<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'v Value> {
        match obj.get(key) {
            Some(Value::Null) | None => {
                self.issue(join(path, key), "is required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn required_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        let value = self.field(obj, path, key)?;
        self.object(value, &join(path, key))
    }

    fn required_array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'v Vec<Value>> {
        match self.field(obj, path, key)? {
            Value::Array(items) => Some(items),
            other => {
                self.issue(
                    join(path, key),
                    format!("expected array, received {}", type_name(other)),
                );
                None
            }
        }
    }

    fn required_string(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<String> {
        match self.field(obj, path, key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.issue(
                    join(path, key),
                    format!("expected string, received {}", type_name(other)),
                );
                None
            }
        }
    }

    /// Missing and null both mean absent. Any other non-string is an issue.
    fn optional_string(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Result<Option<String>, ()> {
        match obj.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => {
                self.issue(
                    join(path, key),
                    format!("expected string, received {}", type_name(other)),
                );
                Err(())
            }
        }
    }

    fn required_bool(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<bool> {
        match self.field(obj, path, key)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.issue(
                    join(path, key),
                    format!("expected boolean, received {}", type_name(other)),
                );
                None
            }
        }
    }

    fn required_integer(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<i32> {
        let value = self.field(obj, path, key)?;
        let parsed = value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok());
        if parsed.is_none() {
            self.issue(
                join(path, key),
                format!("expected integer, received {}", type_name(value)),
            );
        }
        parsed
    }

    fn string_list(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<Vec<String>> {
        let items = self.required_array(obj, path, key)?;
        let list_path = join(path, key);
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => {
                    ok = false;
                    self.issue(
                        index(&list_path, i),
                        format!("expected string, received {}", type_name(other)),
                    );
                }
            }
        }
        ok.then_some(out)
    }

    fn one_of<T>(&mut self, obj: &Map<String, Value>, path: &str, key: &str, allowed: &[T]) -> Option<T>
    where
        T: FromStr + fmt::Display,
    {
        let raw = self.required_string(obj, path, key)?;
        match raw.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.issue(
                    join(path, key),
                    format!("{}, received \"{raw}\"", expected_one_of(allowed)),
                );
                None
            }
        }
    }

    fn course(&mut self, obj: &Map<String, Value>, path: &str) -> Option<CourseDraft> {
        let name = self.required_string(obj, path, "name");
        let subtitle = self.optional_string(obj, path, "subtitle");
        let description = self.required_string(obj, path, "description");
        let category = self.required_string(obj, path, "category");
        let topic = self.required_string(obj, path, "topic");
        let level = self.required_string(obj, path, "level");
        let language = self.optional_string(obj, path, "language");
        let prerequisites = self.optional_string(obj, path, "prerequisites");
        let learning_outcomes = self.string_list(obj, path, "learningOutcomes");
        let duration = self.required_string(obj, path, "duration");
        let no_of_chapters = self.required_integer(obj, path, "noOfChapters");
        let publish = self.required_bool(obj, path, "publish");
        let include_certificate = self.required_bool(obj, path, "includeCertificate");
        let course_banner = self.required_string(obj, path, "courseBanner");

        Some(CourseDraft {
            name: name?,
            subtitle: subtitle.ok()?,
            description: description?,
            category: category?,
            topic: topic?,
            level: level?,
            language: language.ok()?.unwrap_or_else(|| "en".to_string()),
            prerequisites: prerequisites.ok()?,
            learning_outcomes: learning_outcomes?,
            duration: duration?,
            no_of_chapters: no_of_chapters?,
            publish: publish?,
            include_certificate: include_certificate?,
            course_banner: course_banner?,
        })
    }

    fn chapter(&mut self, value: &Value, path: &str) -> Option<ChapterDraft> {
        let obj = self.object(value, path)?;
        let chapter_id = self.required_integer(obj, path, "chapterId");
        let title = self.required_string(obj, path, "title");
        let description = self.required_string(obj, path, "description");
        let estimated_duration = self.required_string(obj, path, "estimatedDuration");
        let lessons = self.required_array(obj, path, "lessons").and_then(|items| {
            let lessons_path = join(path, "lessons");
            let outlines = items
                .iter()
                .enumerate()
                .map(|(i, item)| self.lesson_outline(item, &index(&lessons_path, i)))
                .collect::<Vec<_>>();
            outlines.into_iter().collect::<Option<Vec<_>>>()
        });

        Some(ChapterDraft {
            chapter_id: chapter_id?,
            title: title?,
            description: description?,
            estimated_duration: estimated_duration?,
            lessons: lessons?,
        })
    }

    fn lesson_outline(&mut self, value: &Value, path: &str) -> Option<LessonOutline> {
        let obj = self.object(value, path)?;
        let lesson_id = self.required_string(obj, path, "lessonId");
        let title = self.required_string(obj, path, "title");
        let lesson_type = self.required_string(obj, path, "type");
        let duration = self.required_string(obj, path, "duration");
        let description = self.required_string(obj, path, "description");

        Some(LessonOutline {
            lesson_id: lesson_id?,
            title: title?,
            lesson_type: lesson_type?,
            duration: duration?,
            description: description?,
        })
    }

    fn lesson(&mut self, value: &Value, path: &str) -> Option<LessonDraft> {
        let obj = self.object(value, path)?;
        let lesson_id = self.required_string(obj, path, "lessonId");
        let title = self.required_string(obj, path, "title");
        let lesson_type = self.one_of(obj, path, "type", &LessonType::ALL);
        let description = self.required_string(obj, path, "description");
        let duration = self.required_string(obj, path, "duration");
        let content = self.optional_string(obj, path, "content");
        let video_url = self.optional_string(obj, path, "videoUrl");
        let resources = match obj.get("resources") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => {
                let resources_path = join(path, "resources");
                let parsed = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        validate_resource(item, &index(&resources_path, i))
                            .map_err(|Invalid(issues)| self.issues.extend(issues))
                            .ok()
                    })
                    .collect::<Vec<_>>();
                parsed.into_iter().collect::<Option<Vec<_>>>().map(Some).ok_or(())
            }
            Some(other) => {
                self.issue(
                    join(path, "resources"),
                    format!("expected array, received {}", type_name(other)),
                );
                Err(())
            }
        };

        Some(LessonDraft {
            lesson_id: lesson_id?,
            title: title?,
            lesson_type: lesson_type?,
            description: description?,
            duration: duration?,
            content: content.ok()?,
            video_url: video_url.ok()?,
            resources: resources.ok()?,
        })
    }

    fn resource(&mut self, value: &Value, path: &str) -> Option<CreateLessonResource> {
        let obj = self.object(value, path)?;
        let title = self.required_string(obj, path, "title");
        let url = self.required_string(obj, path, "url");
        let resource_type = self.one_of(obj, path, "type", &ResourceType::ALL);

        Some(CreateLessonResource {
            title: title?,
            url: url?,
            resource_type: resource_type?,
        })
    }
}
