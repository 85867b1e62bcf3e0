//! The collaborator surface consumed by front-end channels.
//!
//! Both entry points are total functions: every internal failure is folded
//! into a user-visible placeholder (fallback course, apology string) that
//! embeds the original cause text, so the presentation layer never needs a
//! failure-handling branch.

use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::course::{self, Course, Difficulty};
use crate::llm::{ChatTurn, LlmProvider, ModelError, providers};
use crate::{prompt, tutor};

/// Owns the configured model provider. Cheap to share behind an `Arc`;
/// holds no mutable state.
pub struct LearnService {
    provider: LlmProvider,
}

impl LearnService {
    /// Build the service from config and the optional API key.
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self, ModelError> {
        Ok(Self { provider: providers::build(config, api_key)? })
    }

    /// Build the service around an existing provider (tests, embedding).
    pub fn with_provider(provider: LlmProvider) -> Self {
        Self { provider }
    }

    /// Generate a complete course for `topic` at `difficulty`.
    ///
    /// One model call, no history. Never fails outward: a gateway error or
    /// an unparseable reply both degrade to the fallback course.
    pub async fn generate_course(
        &self,
        topic: &str,
        difficulty: Difficulty,
        additional_info: &str,
    ) -> Course {
        let (system, user) = prompt::build_course_prompt(topic, difficulty, additional_info);
        info!(%topic, %difficulty, "generating course");
        match self.provider.generate(&system, &[], &user).await {
            Ok(raw) => course::extract::extract(&raw, topic, difficulty),
            Err(e) => {
                warn!(%topic, error = %e, "model call failed — returning fallback course");
                course::extract::fallback_course(topic, difficulty, &e.to_string())
            }
        }
    }

    /// Answer a tutoring question scoped to `lesson_context`. Never fails
    /// outward; see [`tutor::answer`].
    pub async fn ask_tutor(
        &self,
        question: &str,
        lesson_context: &str,
        history: &[ChatTurn],
    ) -> String {
        tutor::answer(&self.provider, question, lesson_context, history).await
    }
}
