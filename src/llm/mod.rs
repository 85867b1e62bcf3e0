//! LLM provider abstraction — the sole boundary to the generative model.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Async is delegated to the underlying provider; `generate` is an
//! `async fn` on the enum so callers need no trait-object machinery.
//!
//! Every call is a single round-trip: no internal retries, no queueing.
//! A failed call surfaces as [`ModelError`] immediately.

pub mod providers;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Transcript types ──────────────────────────────────────────────────────────

/// Author of a chat turn. Serialized lowercase (`"user"` / `"assistant"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a tutoring conversation.
///
/// A transcript is an ordered `Vec<ChatTurn>`, append-only from the
/// caller's side; the gateway only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    /// Transport or provider failure. The cause is kept as an opaque string;
    /// provider-specific error codes are embedded, never interpreted.
    #[error("model request failed: {0}")]
    Request(String),
}

// ── History replay policy ─────────────────────────────────────────────────────

/// Maximum number of prior turns replayed per request.
pub const HISTORY_WINDOW: usize = 5;

/// Select the turns to replay as conversation context: at most the last
/// [`HISTORY_WINDOW`] entries whose role is `user`, in original relative
/// order.
///
/// Assistant turns are never replayed. This one-sided policy is a documented
/// contract of the gateway, kept to bound token usage; callers that need the
/// model to see its own prior answers must fold them into the final message.
pub fn context_window(history: &[ChatTurn]) -> Vec<&ChatTurn> {
    let user_turns: Vec<&ChatTurn> = history
        .iter()
        .filter(|t| t.role == Role::User)
        .collect();
    let skip = user_turns.len().saturating_sub(HISTORY_WINDOW);
    user_turns.into_iter().skip(skip).collect()
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `generate` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Gemini(providers::gemini::GeminiProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl LlmProvider {
    /// Perform one model call: `system` instruction, the replayed context
    /// window from `history`, then `message`. Returns the reply text.
    pub async fn generate(
        &self,
        system: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, ModelError> {
        let window = context_window(history);
        match self {
            LlmProvider::Gemini(p) => p.complete(system, &window, message).await,
            LlmProvider::Dummy(p) => p.complete(system, &window, message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(entries: &[(Role, &str)]) -> Vec<ChatTurn> {
        entries.iter()
            .map(|(role, content)| ChatTurn { role: *role, content: (*content).to_string() })
            .collect()
    }

    #[test]
    fn window_keeps_only_user_turns() {
        let history = turns(&[
            (Role::User, "q1"),
            (Role::Assistant, "a1"),
            (Role::User, "q2"),
            (Role::Assistant, "a2"),
        ]);
        let window = context_window(&history);
        let contents: Vec<&str> = window.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "q2"]);
    }

    #[test]
    fn window_caps_at_five_most_recent() {
        let history = turns(&[
            (Role::User, "q1"),
            (Role::User, "q2"),
            (Role::User, "q3"),
            (Role::User, "q4"),
            (Role::User, "q5"),
            (Role::User, "q6"),
            (Role::User, "q7"),
        ]);
        let window = context_window(&history);
        let contents: Vec<&str> = window.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["q3", "q4", "q5", "q6", "q7"]);
    }

    #[test]
    fn window_preserves_relative_order_with_interleaving() {
        let history = turns(&[
            (Role::Assistant, "greeting"),
            (Role::User, "first"),
            (Role::Assistant, "reply"),
            (Role::User, "second"),
        ]);
        let window = context_window(&history);
        let contents: Vec<&str> = window.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn window_empty_history() {
        assert!(context_window(&[]).is_empty());
    }

    #[tokio::test]
    async fn generate_replays_window_through_provider() {
        // Echo mode reports how many turns were replayed.
        let provider = LlmProvider::Dummy(providers::dummy::DummyProvider::echo());
        let history = turns(&[
            (Role::User, "q1"),
            (Role::User, "q2"),
            (Role::User, "q3"),
            (Role::User, "q4"),
            (Role::User, "q5"),
            (Role::User, "q6"),
            (Role::User, "q7"),
        ]);
        let reply = provider.generate("sys", &history, "final").await.unwrap();
        assert_eq!(reply, "[echo:5] final");
    }

    #[test]
    fn role_serializes_lowercase() {
        let turn = ChatTurn::user("hi");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        let back: ChatTurn = serde_json::from_value(json).unwrap();
        assert_eq!(back, turn);
    }

    #[test]
    fn request_error_embeds_cause() {
        let e = ModelError::Request("quota exceeded".into());
        assert!(e.to_string().contains("quota exceeded"));
    }
}
