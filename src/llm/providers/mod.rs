//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory — called at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod gemini;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ModelError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from the `GOOGLE_API_KEY` env (never TOML). Its
/// absence is not validated here — a keyless provider fails on first call.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ModelError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider::echo())),
        "gemini" => {
            let g = &config.gemini;
            let p = gemini::GeminiProvider::new(
                g.api_base_url.clone(),
                g.model.clone(),
                g.temperature,
                g.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::Gemini(p))
        }
        _ => Err(ModelError::UnknownProvider(config.provider.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn build_dummy_provider() {
        let cfg = Config::test_default();
        let provider = build(&cfg.llm, None).unwrap();
        assert!(matches!(provider, LlmProvider::Dummy(_)));
    }

    #[test]
    fn build_gemini_provider() {
        let mut cfg = Config::test_default();
        cfg.llm.provider = "gemini".into();
        let provider = build(&cfg.llm, Some("key".into())).unwrap();
        assert!(matches!(provider, LlmProvider::Gemini(_)));
    }

    #[test]
    fn unknown_provider_rejected() {
        let mut cfg = Config::test_default();
        cfg.llm.provider = "mystery".into();
        let err = build(&cfg.llm, None).unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }
}
