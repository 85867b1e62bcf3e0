//! Logging initialisation via tracing-subscriber.
//!
//! [`init`] is called exactly once at startup, after the effective level is
//! resolved from CLI flags, env, and config.

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::AppError;

/// Initialise the global tracing subscriber.
///
/// `level` accepts standard level strings (`"error"` … `"trace"`) or any
/// `EnvFilter` directive. When `prefer_level` is set, `level` wins and
/// `RUST_LOG` is only a fallback; otherwise `RUST_LOG` wins. Logs go to
/// `log_file` when given, stderr otherwise — stdout stays clean for the
/// console channel.
pub fn init(level: &str, prefer_level: bool, log_file: Option<&Path>) -> Result<(), AppError> {
    let filter = resolve_filter(level, prefer_level)?;

    let writer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::Logger(format!("cannot open log file '{}': {e}", path.display()))
                })?;
            BoxMakeWriter::new(file)
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .map_err(|e| AppError::Logger(format!("subscriber already set: {e}")))
}

fn resolve_filter(level: &str, prefer_level: bool) -> Result<EnvFilter, AppError> {
    let from_level = EnvFilter::try_new(level).map_err(|e| e.to_string());
    let from_env = EnvFilter::try_from_default_env().map_err(|e| e.to_string());
    let picked = if prefer_level {
        from_level.or(from_env)
    } else {
        from_env.or(from_level)
    };
    picked.map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))
}

/// Parse a log level string into a [`LevelFilter`], rejecting unknown
/// values. Used to validate config before the subscriber goes up.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
