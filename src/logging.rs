//! Logging setup.
//!
//! Normal runs log to stderr. With `--debug` a daily-rolling file is written
//! under `.kartuli/logs/` as well, at debug level.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "kartuli.log";

static ACTIVE_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug_mode: bool,
    pub level: String,
    pub log_dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            level: "info".to_string(),
            log_dir: default_log_dir(),
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    /// Filter directive. `RUST_LOG` wins over the configured level.
    fn filter(&self) -> EnvFilter {
        let level = if self.debug_mode { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("kartuli={level},tower_http={level},warn")))
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".kartuli").join("logs")
}

/// Directory log files go to (or would go to, if debug mode is off).
pub fn log_dir() -> PathBuf {
    ACTIVE_LOG_DIR.get().cloned().unwrap_or_else(default_log_dir)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    // `logs status` / `logs clean` read this even when file logging is off.
    let _ = ACTIVE_LOG_DIR.set(config.log_dir.clone());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if !config.debug_mode {
        tracing_subscriber::registry()
            .with(config.filter())
            .with(stderr_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
        return Ok(None);
    }

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(config.filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("File logging enabled in {}", config.log_dir.display());
    Ok(Some(guard))
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
}

/// Newest log file in the active directory, if any.
pub fn latest_log_file() -> Option<PathBuf> {
    std::fs::read_dir(log_dir())
        .ok()?
        .flatten()
        .filter(|e| is_log_file(&e.path()))
        .filter_map(|e| {
            let modified = e.metadata().ok()?.modified().ok()?;
            Some((modified, e.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// Delete log files older than `max_age_days`. Returns how many were removed.
pub fn cleanup_old_logs(max_age_days: u64) -> Result<usize> {
    cleanup_logs_in(&log_dir(), max_age_days)
}

fn cleanup_logs_in(dir: &Path, max_age_days: u64) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let max_age = Duration::from_secs(max_age_days * 24 * 60 * 60);
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory: {:?}", dir))?
        .flatten()
    {
        let path = entry.path();
        if !is_log_file(&path) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if now.duration_since(modified).unwrap_or_default() > max_age {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to remove old log {}: {}", path.display(), e),
            }
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .with_debug_mode(true)
            .with_level("warn")
            .with_log_dir(PathBuf::from("/tmp/kartuli-logs"));
        assert!(config.debug_mode);
        assert_eq!(config.level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/kartuli-logs"));
    }

    #[test]
    fn test_custom_log_dir_is_active_without_debug_mode() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("custom-logs");

        // Only this test installs a subscriber; the directory is recorded
        // before installation either way.
        let _ = init_logging(LogConfig::new().with_log_dir(custom.clone()));

        assert_eq!(log_dir(), custom);
        // Non-debug runs never create the directory.
        assert!(!custom.exists());
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(cleanup_logs_in(&missing, 7).unwrap(), 0);
    }

    #[test]
    fn test_cleanup_keeps_fresh_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("kartuli.log.2026-10-18"), "fresh").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a log").unwrap();

        assert_eq!(cleanup_logs_in(dir.path(), 7).unwrap(), 0);
        // Zero-day retention removes every log file but leaves other files.
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cleanup_logs_in(dir.path(), 0).unwrap(), 1);
        assert!(dir.path().join("notes.txt").exists());
    }
}
