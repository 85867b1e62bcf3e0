//! Gemini `generateContent` provider.
//!
//! Exposes the same `complete(system, turns, message)` interface as the rest
//! of the `LlmProvider` abstraction. All Gemini wire types are private to
//! this module — callers never see them. The provider is stateless; history
//! selection belongs to the gateway layer.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::llm::{ChatTurn, ModelError};

// ── Public provider ───────────────────────────────────────────────────────────

/// Adapter for the Google Generative Language REST API.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_base_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Build a provider from config values and an optional API key.
    ///
    /// When present, the key is sent as the `x-goog-api-key` header on every
    /// request. A missing key is not an error here — the first call will
    /// fail with the provider's auth message instead.
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ModelError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_base_url, model, temperature, api_key })
    }

    /// Send one `generateContent` request: `system` as the system
    /// instruction, `turns` replayed as prior user contents, `message` as
    /// the final content. One round-trip only — no retries.
    pub async fn complete(
        &self,
        system: &str,
        turns: &[&ChatTurn],
        message: &str,
    ) -> Result<String, ModelError> {
        let mut contents = Vec::with_capacity(turns.len() + 1);
        for turn in turns {
            contents.push(Content::user(&turn.content));
        }
        contents.push(Content::user(message));

        let payload = GenerateContentRequest {
            system_instruction: (!system.is_empty()).then(|| Content::bare(system)),
            contents,
            generation_config: Some(GenerationConfig { temperature: self.temperature }),
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model
        );

        debug!(
            model = %self.model,
            contents = payload.contents.len(),
            message_len = message.len(),
            "sending generateContent request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full request payload");
        }

        let mut req = self.client.post(&url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.header("x-goog-api-key", key);
        }

        let response = req.send().await.map_err(|e| {
            error!(url = %url, error = %e, "model HTTP request failed (transport)");
            ModelError::Request(e.to_string())
        })?;

        let response = check_status(response).await?;

        let parsed = response.json::<GenerateContentResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize model response");
            ModelError::Request(format!("failed to parse response body: {e}"))
        })?;

        debug!(candidates = parsed.candidates.len(), "received generateContent response");

        candidate_text(parsed)
    }
}

/// Pull the first candidate's text out of a response, trimmed.
/// An empty or missing candidate is an error, not an empty reply.
fn candidate_text(parsed: GenerateContentResponse) -> Result<String, ModelError> {
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ModelError::Request("empty or missing candidate text in response".into()))
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self { role: Some("user".to_string()), parts: vec![Part { text: text.to_string() }] }
    }

    /// A content without a role — the shape `systemInstruction` expects.
    fn bare(text: &str) -> Self {
        Self { role: None, parts: vec![Part { text: text.to_string() }] }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

// Error envelope used by Google APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(&body) {
        let tag = env
            .error
            .status
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        format!("HTTP {status}{tag}: {}", env.error.message)
    } else {
        format!("HTTP {status}: {body}")
    };

    error!(%status, %message, "model request returned HTTP error");
    Err(ModelError::Request(message))
}
