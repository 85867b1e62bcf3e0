//! Dummy LLM provider — deterministic in-process backend.
//! Used for testing the full generate/answer round-trip without a real
//! API key.

use crate::llm::{ChatTurn, ModelError};

/// What the dummy does with each call.
#[derive(Debug, Clone)]
pub enum DummyBehavior {
    /// Echo the final message back, prefixed with the replayed-turn count:
    /// `[echo:{n}] {message}`.
    Echo,
    /// Always return this text.
    Reply(String),
    /// Always fail with this cause.
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct DummyProvider {
    behavior: DummyBehavior,
}

impl DummyProvider {
    pub fn echo() -> Self {
        Self { behavior: DummyBehavior::Echo }
    }

    pub fn reply(text: impl Into<String>) -> Self {
        Self { behavior: DummyBehavior::Reply(text.into()) }
    }

    pub fn fail(cause: impl Into<String>) -> Self {
        Self { behavior: DummyBehavior::Fail(cause.into()) }
    }

    pub async fn complete(
        &self,
        _system: &str,
        turns: &[&ChatTurn],
        message: &str,
    ) -> Result<String, ModelError> {
        match &self.behavior {
            DummyBehavior::Echo => Ok(format!("[echo:{}] {message}", turns.len())),
            DummyBehavior::Reply(text) => Ok(text.clone()),
            DummyBehavior::Fail(cause) => Err(ModelError::Request(cause.clone())),
        }
    }
}
