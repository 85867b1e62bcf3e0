//! Prompt assembly for course generation and tutoring turns.
//!
//! Templates live under `config/prompts/` as plain-text fragments with
//! `{{key}}` placeholders and are embedded at compile time, so assembly is
//! pure: no I/O at call time, no randomness, identical output for identical
//! inputs.
//!
//! Topic validation is the caller's responsibility — the builder
//! substitutes whatever it is given.

use std::collections::HashMap;

use crate::course::Difficulty;

const COURSE_SYSTEM: &str = include_str!("../config/prompts/course_system.txt");
const COURSE_GENERATION: &str = include_str!("../config/prompts/course_generation.txt");
const TUTOR_CONTEXT: &str = include_str!("../config/prompts/tutor_context.txt");

const SEPARATOR: &str = "\n\n";

/// Fluent builder that joins template fragments and applies `{{key}}`
/// substitution once at [`build`](PromptBuilder::build) time.
pub struct PromptBuilder {
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self { parts: Vec::new(), vars: HashMap::new() }
    }

    /// Append a text fragment. Blank fragments are skipped.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim().to_string();
        if !trimmed.is_empty() {
            self.parts.push(trimmed);
        }
        self
    }

    /// Register a `{{key}}` → `value` substitution applied at build time.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Assemble all fragments, join with blank lines, and substitute vars.
    pub fn build(self) -> String {
        let mut prompt = self.parts.join(SEPARATOR);
        for (k, v) in &self.vars {
            let placeholder = format!("{{{{{}}}}}", k);
            prompt = prompt.replace(&placeholder, v);
        }
        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the course-generation instruction pair: (system, user).
///
/// The user instruction requests a title, 5–7 modules, 5–8 lessons per
/// module, 300–500 word lesson content, and a JSON-only reply matching the
/// course schema.
pub fn build_course_prompt(
    topic: &str,
    difficulty: Difficulty,
    additional_info: &str,
) -> (String, String) {
    let info = if additional_info.trim().is_empty() { "none" } else { additional_info };
    let user = PromptBuilder::new()
        .append(COURSE_GENERATION)
        .var("topic", topic)
        .var("difficulty", difficulty.to_string())
        .var("additional_info", info)
        .build();
    (COURSE_SYSTEM.trim().to_string(), user)
}

/// Build the tutor system instruction, scoping the assistant to the
/// supplied lesson context.
pub fn build_tutor_prompt(lesson_context: &str) -> String {
    PromptBuilder::new()
        .append(TUTOR_CONTEXT)
        .var("lesson_context", lesson_context)
        .build()
}
