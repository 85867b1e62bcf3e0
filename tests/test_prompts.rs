//! Tests for prompt templates under config/prompts.
//!
//! The templates are embedded into the binary at compile time, but they are
//! also the operator-facing place to tune wording — these tests keep the
//! files and their `{{var}}` placeholders in place.

use std::fs;
use std::path::Path;

fn prompts_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/prompts")
}

fn prompt_path(name: &str) -> std::path::PathBuf {
    prompts_dir().join(name)
}

#[test]
fn test_course_system_prompt_exists() {
    assert!(prompt_path("course_system.txt").exists(), "course_system.txt prompt file missing");
}

#[test]
fn test_course_generation_prompt_exists() {
    assert!(
        prompt_path("course_generation.txt").exists(),
        "course_generation.txt prompt file missing"
    );
}

#[test]
fn test_tutor_prompt_exists() {
    assert!(prompt_path("tutor_context.txt").exists(), "tutor_context.txt prompt file missing");
}

#[test]
fn test_course_generation_template_vars() {
    let text = fs::read_to_string(prompt_path("course_generation.txt")).unwrap();
    assert!(text.contains("{{topic}}"), "course_generation.txt should contain {{topic}} variable");
    assert!(
        text.contains("{{difficulty}}"),
        "course_generation.txt should contain {{difficulty}} variable"
    );
    assert!(
        text.contains("{{additional_info}}"),
        "course_generation.txt should contain {{additional_info}} variable"
    );
}

#[test]
fn test_course_generation_requests_json_only() {
    let text = fs::read_to_string(prompt_path("course_generation.txt")).unwrap();
    assert!(text.contains("valid JSON only"), "course_generation.txt should demand JSON-only output");
    assert!(text.contains("\"lessons\""), "course_generation.txt should show the course schema");
}

#[test]
fn test_tutor_template_vars() {
    let text = fs::read_to_string(prompt_path("tutor_context.txt")).unwrap();
    assert!(
        text.contains("{{lesson_context}}"),
        "tutor_context.txt should contain {{lesson_context}} variable"
    );
}
