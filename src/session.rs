//! Caller-owned page state: navigation cursor, completion set, transcript.
//!
//! The course value itself is immutable; everything a front-end mutates
//! while a learner works through it lives here, as an explicit state struct
//! passed into event handlers — never ambient globals. All handlers are
//! pure state transitions; none perform I/O.

use std::collections::HashSet;

use uuid::Uuid;

use crate::course::{Course, LessonRef};
use crate::llm::{ChatTurn, Role};

/// Mutable per-learner state for one course run.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Stable identity for this run (ephemeral — one per course generation).
    pub session_id: Uuid,
    /// Currently viewed lesson, 1-based.
    cursor: LessonRef,
    /// Lessons marked complete, keyed by their stable reference.
    completed: HashSet<LessonRef>,
    /// Tutoring transcript, append-only.
    transcript: Vec<ChatTurn>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            cursor: LessonRef::new(1, 1),
            completed: HashSet::new(),
            transcript: Vec::new(),
        }
    }

    /// Reset for a freshly generated course: new id, cursor back to 1.1,
    /// completion set and transcript cleared.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn cursor(&self) -> LessonRef {
        self.cursor
    }

    /// Move the cursor to `at` if that lesson exists in `course`.
    /// Returns whether the move happened.
    pub fn select(&mut self, course: &Course, at: LessonRef) -> bool {
        if course.lesson(at).is_some() {
            self.cursor = at;
            true
        } else {
            false
        }
    }

    /// Advance to the next lesson, rolling into the next module at a module
    /// boundary. Returns the new cursor, or `None` at the end of the course.
    pub fn advance(&mut self, course: &Course) -> Option<LessonRef> {
        let within = LessonRef::new(self.cursor.module, self.cursor.lesson + 1);
        let next_module = LessonRef::new(self.cursor.module + 1, 1);
        let next = if course.lesson(within).is_some() {
            within
        } else if course.lesson(next_module).is_some() {
            next_module
        } else {
            return None;
        };
        self.cursor = next;
        Some(next)
    }

    pub fn mark_complete(&mut self, at: LessonRef) {
        self.completed.insert(at);
    }

    pub fn is_complete(&self, at: LessonRef) -> bool {
        self.completed.contains(&at)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Completion percentage against `course`, 0 when the course is empty.
    pub fn progress_percent(&self, course: &Course) -> u8 {
        let total = course.total_lessons();
        if total == 0 {
            return 0;
        }
        ((self.completed.len() * 100) / total) as u8
    }

    /// Append one turn to the transcript.
    pub fn transcript_append(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push(ChatTurn { role, content: content.into() });
    }

    /// The transcript so far — read-only; the tutor only ever reads it.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
