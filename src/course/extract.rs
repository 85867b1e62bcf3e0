//! Raw model text → validated [`Course`], or the fallback course.
//!
//! [`extract`] is total: any problem (non-JSON text, missing keys, wrong
//! shapes, empty module/lesson lists) degrades to a renderable placeholder
//! course that embeds the failure description, so the caller never needs a
//! failure branch.
//!
//! Models frequently wrap JSON in a markdown code fence despite being told
//! not to, so the reply is normalized first: leading ```` ```json ````
//! marker stripped, trailing ```` ``` ```` marker stripped, then trimmed.
//! The module/lesson counts and content lengths requested in the prompt are
//! advisory to the model and deliberately not re-validated here.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::{Course, Difficulty, Lesson, Module};

/// Internal failure detail. Never escapes this module — it is folded into
/// the fallback course's lesson content.
#[derive(Debug, Error)]
enum ExtractionError {
    #[error("reply is not valid course JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Shape(String),
}

// Wire shape of the reply. Strict: a missing key or wrong type is a serde
// error, and unknown extra keys are ignored.
#[derive(Deserialize)]
struct WireCourse {
    title: String,
    // Presence and type are validated, but the requested difficulty is
    // canonical — the model's echo of it is not round-tripped.
    #[allow(dead_code)]
    difficulty: String,
    modules: Vec<WireModule>,
}

#[derive(Deserialize)]
struct WireModule {
    title: String,
    description: String,
    lessons: Vec<WireLesson>,
}

#[derive(Deserialize)]
struct WireLesson {
    title: String,
    content: String,
}

/// Turn a raw model reply into a structurally valid course.
///
/// On any failure returns the fallback course for `topic` with the given
/// difficulty; it never fails outward and never recovers partially.
pub fn extract(raw: &str, topic: &str, difficulty: Difficulty) -> Course {
    match parse_course(raw, difficulty) {
        Ok(course) => course,
        Err(e) => {
            warn!(%topic, error = %e, "course extraction failed — returning fallback course");
            fallback_course(topic, difficulty, &e.to_string())
        }
    }
}

/// Strip markdown fence markers and surrounding whitespace.
/// Idempotent: already-clean JSON passes through unchanged.
fn normalize(raw: &str) -> &str {
    let s = raw.strip_prefix("```json").unwrap_or(raw);
    let s = s.strip_suffix("```").unwrap_or(s);
    s.trim()
}

fn parse_course(raw: &str, difficulty: Difficulty) -> Result<Course, ExtractionError> {
    let wire: WireCourse = serde_json::from_str(normalize(raw))?;

    if wire.modules.is_empty() {
        return Err(ExtractionError::Shape("course has no modules".into()));
    }

    let mut modules = Vec::with_capacity(wire.modules.len());
    for (i, m) in wire.modules.into_iter().enumerate() {
        if m.lessons.is_empty() {
            return Err(ExtractionError::Shape(format!("module {} has no lessons", i + 1)));
        }
        let mut lessons = Vec::with_capacity(m.lessons.len());
        for (j, l) in m.lessons.into_iter().enumerate() {
            let title = l.title.trim();
            let content = l.content.trim();
            if title.is_empty() || content.is_empty() {
                return Err(ExtractionError::Shape(format!(
                    "lesson {}.{} has an empty title or content",
                    i + 1,
                    j + 1
                )));
            }
            lessons.push(Lesson { title: title.to_string(), content: content.to_string() });
        }
        modules.push(Module { title: m.title, description: m.description, lessons });
    }

    Ok(Course { title: wire.title, difficulty, modules })
}

/// The fixed placeholder returned whenever generation or extraction fails.
/// Always renderable: one module, one lesson, cause embedded in the content.
pub(crate) fn fallback_course(topic: &str, difficulty: Difficulty, cause: &str) -> Course {
    Course {
        title: format!("Error generating course on {topic}"),
        difficulty,
        modules: vec![Module {
            title: "Error Module".to_string(),
            description: "An error occurred while generating the course content.".to_string(),
            lessons: vec![Lesson {
                title: "Error Information".to_string(),
                content: format!(
                    "We encountered an error while generating your course: {cause}. \
                     Please try again with a different topic or check your API key configuration."
                ),
            }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "title": "Photosynthesis Fundamentals",
        "difficulty": "Beginner",
        "modules": [
            {
                "title": "Light Reactions",
                "description": "How plants capture light",
                "lessons": [
                    {"title": "Chlorophyll", "content": "Pigments absorb light."},
                    {"title": "ATP Synthesis", "content": "Energy carriers form."}
                ]
            },
            {
                "title": "Calvin Cycle",
                "description": "Carbon fixation",
                "lessons": [
                    {"title": "CO2 Capture", "content": "RuBisCO binds carbon dioxide."}
                ]
            }
        ]
    }"#;

    #[test]
    fn well_formed_reply_round_trips() {
        let course = extract(WELL_FORMED, "Photosynthesis", Difficulty::Beginner);
        assert_eq!(course.title, "Photosynthesis Fundamentals");
        assert_eq!(course.difficulty, Difficulty::Beginner);
        assert_eq!(course.modules.len(), 2);
        assert_eq!(course.modules[0].lessons.len(), 2);
        assert_eq!(course.modules[1].lessons[0].title, "CO2 Capture");
    }

    #[test]
    fn fenced_reply_is_stripped_and_parsed() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        let course = extract(&fenced, "Photosynthesis", Difficulty::Beginner);
        assert_eq!(course.modules.len(), 2);
    }

    #[test]
    fn normalize_is_idempotent_on_clean_input() {
        let clean = WELL_FORMED.trim();
        assert_eq!(normalize(clean), clean);
        assert_eq!(normalize(normalize(clean)), clean);
    }

    #[test]
    fn non_json_reply_yields_fallback() {
        let course = extract("Sorry, I can't help.", "Photosynthesis", Difficulty::Intermediate);
        assert_eq!(course.title, "Error generating course on Photosynthesis");
        assert_eq!(course.difficulty, Difficulty::Intermediate);
        assert_eq!(course.modules.len(), 1);
        assert_eq!(course.modules[0].title, "Error Module");
        assert_eq!(course.modules[0].lessons.len(), 1);
        assert_eq!(course.modules[0].lessons[0].title, "Error Information");
    }

    #[test]
    fn missing_key_yields_fallback() {
        // No "modules" key.
        let raw = r#"{"title": "T", "difficulty": "Beginner"}"#;
        let course = extract(raw, "Rust", Difficulty::Beginner);
        assert_eq!(course.title, "Error generating course on Rust");
    }

    #[test]
    fn wrong_type_yields_fallback() {
        let raw = r#"{"title": "T", "difficulty": "Beginner", "modules": "oops"}"#;
        let course = extract(raw, "Rust", Difficulty::Beginner);
        assert_eq!(course.modules[0].title, "Error Module");
    }

    #[test]
    fn empty_module_list_yields_fallback() {
        let raw = r#"{"title": "T", "difficulty": "Beginner", "modules": []}"#;
        let course = extract(raw, "Rust", Difficulty::Advanced);
        assert_eq!(course.difficulty, Difficulty::Advanced);
        assert!(course.modules[0].lessons[0].content.contains("no modules"));
    }

    #[test]
    fn module_without_lessons_yields_fallback() {
        let raw = r#"{
            "title": "T", "difficulty": "Beginner",
            "modules": [{"title": "M", "description": "d", "lessons": []}]
        }"#;
        let course = extract(raw, "Rust", Difficulty::Beginner);
        assert!(course.modules[0].lessons[0].content.contains("has no lessons"));
    }

    #[test]
    fn blank_lesson_content_yields_fallback() {
        let raw = r#"{
            "title": "T", "difficulty": "Beginner",
            "modules": [{"title": "M", "description": "d",
                         "lessons": [{"title": "L", "content": "   "}]}]
        }"#;
        let course = extract(raw, "Rust", Difficulty::Beginner);
        assert_eq!(course.modules[0].title, "Error Module");
    }

    #[test]
    fn lesson_fields_are_trimmed() {
        let raw = r#"{
            "title": "T", "difficulty": "Beginner",
            "modules": [{"title": "M", "description": "d",
                         "lessons": [{"title": "  L  ", "content": "  body  "}]}]
        }"#;
        let course = extract(raw, "Rust", Difficulty::Beginner);
        assert_eq!(course.modules[0].lessons[0].title, "L");
        assert_eq!(course.modules[0].lessons[0].content, "body");
    }

    #[test]
    fn fallback_embeds_cause_text() {
        let course = fallback_course("Rust", Difficulty::Beginner, "boom");
        assert!(course.modules[0].lessons[0].content.contains("boom"));
    }

    #[test]
    fn unknown_extra_keys_are_ignored() {
        let raw = r#"{
            "title": "T", "difficulty": "Beginner", "estimated_hours": 12,
            "modules": [{"title": "M", "description": "d", "extra": true,
                         "lessons": [{"title": "L", "content": "c", "quiz": []}]}]
        }"#;
        let course = extract(raw, "Rust", Difficulty::Beginner);
        assert_eq!(course.title, "T");
    }
}
