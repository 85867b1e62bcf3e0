//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or an explicit path), then applies `LEARNLEVEL_LOG_LEVEL`. The model
//! credential comes from the `GOOGLE_API_KEY` env var — never from TOML.
//! A missing credential is not an error here; it surfaces from the first
//! model call instead.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

/// Console (stdin/stdout) channel configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Whether the console channel is enabled.
    pub enabled: bool,
}

/// HTTP channel configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whether the HTTP channel is explicitly enabled.
    pub enabled: bool,
    /// Socket address to bind the HTTP channel to.
    pub bind: String,
}

/// Channel configuration (`[channels]`).
#[derive(Debug, Clone)]
pub struct ChannelsConfig {
    pub console: ConsoleConfig,
    pub http: HttpConfig,
}

/// Gemini provider configuration (`[llm.gemini]`).
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL; `models/{model}:generateContent` is appended per call.
    pub api_base_url: String,
    /// Model name used in the request path.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration (`[llm]`).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (e.g. `"gemini"`, `"dummy"`).
    /// Maps to `default` in `[llm]` TOML — named `default` there to signal
    /// that other provider sections can coexist without being loaded.
    pub provider: String,
    /// Config for the Gemini provider (`[llm.gemini]`).
    pub gemini: GeminiConfig,
}

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    pub log_level: String,
    /// Optional log file (already expanded, no `~`). `None` logs to stderr.
    pub log_file: Option<PathBuf>,
    pub channels: ChannelsConfig,
    pub llm: LlmConfig,
    /// API key from the `GOOGLE_API_KEY` env var — never sourced from TOML.
    pub api_key: Option<String>,
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawConfig {
    service: RawService,
    #[serde(default)]
    channels: RawChannels,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawService {
    name: String,
    log_level: String,
    #[serde(default)]
    log_file: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawChannels {
    #[serde(default)]
    console: RawConsole,
    #[serde(default)]
    http: RawHttp,
}

#[derive(Deserialize)]
struct RawConsole {
    /// Defaults to `true`: the console is the fallback front-end.
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize)]
struct RawHttp {
    /// Defaults to `false`: HTTP must be explicitly enabled.
    #[serde(default = "default_false")]
    enabled: bool,
    #[serde(default = "default_http_bind")]
    bind: String,
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    gemini: RawGeminiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), gemini: RawGeminiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawGeminiConfig {
    #[serde(default = "default_gemini_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_gemini_model")]
    model: String,
    #[serde(default = "default_gemini_temperature")]
    temperature: f32,
    #[serde(default = "default_gemini_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawGeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_gemini_api_base_url(),
            model: default_gemini_model(),
            temperature: default_gemini_temperature(),
            timeout_seconds: default_gemini_timeout_seconds(),
        }
    }
}

impl Default for RawConsole {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for RawHttp {
    fn default() -> Self {
        Self { enabled: false, bind: default_http_bind() }
    }
}

fn default_llm_provider() -> String { "gemini".to_string() }
fn default_gemini_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_gemini_model() -> String { "gemini-1.5-pro".to_string() }
fn default_gemini_temperature() -> f32 { 0.7 }
fn default_gemini_timeout_seconds() -> u64 { 120 }
fn default_http_bind() -> String { "127.0.0.1:8080".to_string() }

fn default_true() -> bool { true }
fn default_false() -> bool { false }

/// Load config from `path` (default `config/default.toml`), then apply
/// env-var overrides.
pub fn load(path: Option<&Path>) -> Result<Config, AppError> {
    let log_level_override = env::var("LEARNLEVEL_LOG_LEVEL").ok();
    let default_path = env::var("LEARNLEVEL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/default.toml"));
    load_from(
        path.unwrap_or(&default_path),
        log_level_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and an optional level override.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, log_level_override: Option<&str>) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let s = parsed.service;
    let log_level = log_level_override.unwrap_or(&s.log_level).to_string();
    let log_file = s.log_file.map(|p| expand_home(&p));

    Ok(Config {
        service_name: s.name,
        log_level,
        log_file,
        channels: ChannelsConfig {
            console: ConsoleConfig { enabled: parsed.channels.console.enabled },
            http: HttpConfig {
                enabled: parsed.channels.http.enabled,
                bind: parsed.channels.http.bind,
            },
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            gemini: GeminiConfig {
                api_base_url: parsed.llm.gemini.api_base_url,
                model: parsed.llm.gemini.model,
                temperature: parsed.llm.gemini.temperature,
                timeout_seconds: parsed.llm.gemini.timeout_seconds,
            },
        },
        api_key: env::var("GOOGLE_API_KEY").ok(),
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API key, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            service_name: "test".into(),
            log_level: "info".into(),
            log_file: None,
            channels: ChannelsConfig {
                console: ConsoleConfig { enabled: true },
                http: HttpConfig { enabled: false, bind: default_http_bind() },
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                gemini: GeminiConfig {
                    api_base_url: "http://localhost:0/v1beta".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
            },
            api_key: None,
        }
    }
}
