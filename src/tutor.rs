//! Tutoring turns — one answer string per question.
//!
//! This is the failure boundary of the tutoring path: every gateway error
//! is absorbed here and folded into an apologetic reply that embeds the
//! cause text, so callers never see an error.

use tracing::{debug, warn};

use crate::llm::{ChatTurn, LlmProvider};
use crate::prompt;

/// Answer `question` scoped to `lesson_context`, replaying the gateway's
/// context window from `history`. Total: on success the model text is
/// returned verbatim, on failure a fixed apology embedding the cause.
pub async fn answer(
    provider: &LlmProvider,
    question: &str,
    lesson_context: &str,
    history: &[ChatTurn],
) -> String {
    let system = prompt::build_tutor_prompt(lesson_context);
    debug!(question_len = question.len(), history_len = history.len(), "asking tutor");
    match provider.generate(&system, history, question).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "tutor completion failed — returning apology");
            format!(
                "I'm sorry, I encountered an error while generating a response. \
                 Please try again. Error details: {e}"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::dummy::DummyProvider;

    #[tokio::test]
    async fn ok_reply_returned_verbatim() {
        let provider = LlmProvider::Dummy(DummyProvider::reply("Photosynthesis converts light."));
        let reply = answer(&provider, "How does it work?", "lesson text", &[]).await;
        assert_eq!(reply, "Photosynthesis converts light.");
    }

    #[tokio::test]
    async fn gateway_error_becomes_apology_with_cause() {
        let provider = LlmProvider::Dummy(DummyProvider::fail("quota exceeded"));
        let reply = answer(&provider, "q", "ctx", &[]).await;
        assert!(reply.starts_with("I'm sorry"));
        assert!(reply.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn history_is_read_not_consumed() {
        let provider = LlmProvider::Dummy(DummyProvider::echo());
        let history = vec![ChatTurn::user("q1"), ChatTurn::assistant("a1")];
        let reply = answer(&provider, "q2", "ctx", &history).await;
        // One user turn replayed; the transcript itself is untouched.
        assert_eq!(reply, "[echo:1] q2");
        assert_eq!(history.len(), 2);
    }
}
