//! Canonical course representation.
//!
//! A [`Course`] is created once per generation request and held immutably
//! by the caller afterwards. Navigation cursors and completion tracking are
//! caller-owned state (see [`crate::session`]), keyed by [`LessonRef`] —
//! they are not part of the course value itself.

pub mod extract;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested course difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "Beginner"),
            Difficulty::Intermediate => write!(f, "Intermediate"),
            Difficulty::Advanced => write!(f, "Advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// Case-insensitive parse, for CLI and channel input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: '{other}'")),
        }
    }
}

/// A single unit of content within a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    pub content: String,
}

/// A named group of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub title: String,
    pub description: String,
    pub lessons: Vec<Lesson>,
}

/// The generated top-level educational unit.
///
/// Invariants (enforced at extraction): `modules` is non-empty, every
/// module has at least one lesson, and lesson titles/contents are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub difficulty: Difficulty,
    pub modules: Vec<Module>,
}

/// Stable identity of a lesson within a course: (module, lesson), 1-based.
///
/// Used as the completion-tracking key and the navigation cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonRef {
    pub module: usize,
    pub lesson: usize,
}

impl LessonRef {
    pub fn new(module: usize, lesson: usize) -> Self {
        Self { module, lesson }
    }
}

impl fmt::Display for LessonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.lesson)
    }
}

impl Course {
    /// Look up a lesson by its 1-based reference.
    pub fn lesson(&self, at: LessonRef) -> Option<&Lesson> {
        self.modules
            .get(at.module.checked_sub(1)?)?
            .lessons
            .get(at.lesson.checked_sub(1)?)
    }

    /// Look up a module by its 1-based index.
    pub fn module(&self, index: usize) -> Option<&Module> {
        self.modules.get(index.checked_sub(1)?)
    }

    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

#[cfg(test)]
pub(crate) fn sample_course() -> Course {
    Course {
        title: "Sample".into(),
        difficulty: Difficulty::Beginner,
        modules: vec![
            Module {
                title: "M1".into(),
                description: "first".into(),
                lessons: vec![
                    Lesson { title: "L1".into(), content: "c1".into() },
                    Lesson { title: "L2".into(), content: "c2".into() },
                ],
            },
            Module {
                title: "M2".into(),
                description: "second".into(),
                lessons: vec![Lesson { title: "L3".into(), content: "c3".into() }],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_lookup_is_one_based() {
        let course = sample_course();
        assert_eq!(course.lesson(LessonRef::new(1, 2)).unwrap().title, "L2");
        assert_eq!(course.lesson(LessonRef::new(2, 1)).unwrap().title, "L3");
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let course = sample_course();
        assert!(course.lesson(LessonRef::new(0, 1)).is_none());
        assert!(course.lesson(LessonRef::new(1, 0)).is_none());
        assert!(course.lesson(LessonRef::new(3, 1)).is_none());
        assert!(course.lesson(LessonRef::new(1, 3)).is_none());
    }

    #[test]
    fn total_lessons_sums_modules() {
        assert_eq!(sample_course().total_lessons(), 3);
    }

    #[test]
    fn difficulty_parses_case_insensitive() {
        assert_eq!("beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!("INTERMEDIATE".parse::<Difficulty>().unwrap(), Difficulty::Intermediate);
        assert_eq!(" Advanced ".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_round_trips_through_serde() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"Intermediate\"");
        let back: Difficulty = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Difficulty::Intermediate);
    }

    #[test]
    fn lesson_ref_displays_dotted() {
        assert_eq!(LessonRef::new(2, 3).to_string(), "2.3");
    }
}
