use anyhow::Result;
use clap::Parser;
use kartuli::{cli, config::Config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file before anything else (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli_args = cli::Cli::parse();

    // Peek at the logging section; the full config is validated later by the
    // subcommand that needs it.
    let logging_config = match cli_args.config.as_deref() {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .map(|c| c.logging)
    .unwrap_or_default();

    let mut log_config = logging::LogConfig::new()
        .with_debug_mode(cli_args.debug)
        .with_level(logging_config.level);

    if let Ok(log_dir) = std::env::var("KARTULI_LOG_DIR") {
        log_config = log_config.with_log_dir(std::path::PathBuf::from(log_dir));
    } else if let Some(dir) = logging_config.file {
        log_config = log_config.with_log_dir(dir);
    }

    let _guard = logging::init_logging(log_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    // Clean up old log files (keep last 7 days)
    if cli_args.debug
        && let Ok(removed) = logging::cleanup_old_logs(7)
        && removed > 0
    {
        tracing::info!("Cleaned up {} old log file(s)", removed);
    }

    cli::run(cli_args).await
}
