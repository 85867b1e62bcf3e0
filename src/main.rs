//! learnlevel — binary entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once
//!   6. Build the learn service (provider from config + `GOOGLE_API_KEY`)
//!   7. Spawn Ctrl-C → shutdown signal watcher
//!   8. Run the configured channels until shutdown

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use learnlevel::error::AppError;
use learnlevel::service::LearnService;
use learnlevel::{channels, config, logger};

struct CliArgs {
    config_path: Option<PathBuf>,
    log_level: Option<String>,
    http: bool,
}

fn parse_cli_args() -> CliArgs {
    let mut args = CliArgs { config_path: None, log_level: None, http: false };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" => args.log_level = Some("debug".to_string()),
            "-vv" => args.log_level = Some("trace".to_string()),
            "--config" => args.config_path = iter.next().map(PathBuf::from),
            "--http" => args.http = true,
            other => eprintln!("ignoring unknown argument: {other}"),
        }
    }
    args
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let force_cli_level = args.log_level.is_some();

    logger::init(effective_log_level, force_cli_level, config.log_file.as_deref())?;

    info!(
        service = %config.service_name,
        provider = %config.llm.provider,
        model = %config.llm.gemini.model,
        effective_log_level = %effective_log_level,
        api_key_present = config.api_key.is_some(),
        "config loaded"
    );

    let service = Arc::new(
        LearnService::new(&config.llm, config.api_key.clone())
            .map_err(|e| AppError::Model(e.to_string()))?,
    );

    // Shared shutdown token — Ctrl-C cancels it, all channels watch it.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let http_enabled = args.http || config.channels.http.enabled;

    #[cfg(feature = "channel-http")]
    let http_task = if http_enabled {
        let bind = config.channels.http.bind.clone();
        let service = service.clone();
        let token = shutdown.clone();
        Some(tokio::spawn(async move { channels::http::serve(&bind, service, token).await }))
    } else {
        None
    };

    #[cfg(not(feature = "channel-http"))]
    if http_enabled {
        warn!("http channel requested but the 'channel-http' feature is not compiled in");
    }

    if config.channels.console.enabled {
        channels::console::run(service.clone(), shutdown.clone()).await?;
        // Console exit (quit / stdin closed) takes the process down.
        shutdown.cancel();
    } else {
        shutdown.cancelled().await;
    }

    #[cfg(feature = "channel-http")]
    if let Some(task) = http_task {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("http channel exited with error: {e}"),
            Err(e) => warn!("http channel task failed: {e}"),
        }
    }

    info!("shutdown complete");
    Ok(())
}
