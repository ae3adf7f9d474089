//! Configuration types, defaults, loading, and validation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::KartuliError;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech synthesis and audio history configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: "0.0.0.0")
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static` when it exists
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Speech synthesis (Gemini TTS) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Synthesize audio for every transformation
    #[serde(default)]
    pub enabled: bool,

    /// Gemini API key (loaded from GEMINI_API_KEY / GOOGLE_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL override
    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    /// TTS model (default: "gemini-2.5-flash-preview-tts")
    #[serde(default = "default_speech_model")]
    pub model: String,

    /// Prebuilt voice name (default: "Kore")
    #[serde(default = "default_speech_voice")]
    pub voice: String,

    /// Where generated WAV files are written and served from
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// Number of records returned by `/history`
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Request timeout for the provider, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_speech_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}
fn default_speech_voice() -> String {
    "Kore".to_string()
}
fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}
fn default_history_limit() -> usize {
    5
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: default_speech_base_url(),
            model: default_speech_model(),
            voice: default_speech_voice(),
            audio_dir: default_audio_dir(),
            history_limit: default_history_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SpeechConfig {
    /// Enabled and usable: a key is present.
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory used in debug mode
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Canonical base directory: `~/.kartuli/`
pub fn kartuli_home() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".kartuli")
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.kartuli/config.toml
    /// 3. Local config: ./kartuli.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        let system_config_path = Self::system_config_path();
        if system_config_path.exists() {
            tracing::debug!("Loading system config from: {:?}", system_config_path);
            config = Self::from_file(&system_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = Self::from_file(&local_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let mut config = Self::from_file(path)?;
        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Get the system config path: ~/.kartuli/config.toml
    pub fn system_config_path() -> PathBuf {
        kartuli_home().join("config.toml")
    }

    fn local_config_path() -> PathBuf {
        PathBuf::from("./kartuli.toml")
    }

    /// Parse a TOML file. A later file replaces an earlier one wholesale;
    /// missing sections fall back to defaults.
    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn apply_env_overrides(config: &mut Self) {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok());
    }

    /// Overrides from any key/value source; split out so tests don't touch
    /// the process environment.
    fn apply_overrides_from(config: &mut Self, var: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = var("KARTULI_BIND") {
            config.server.bind = bind;
        }

        if let Some(port) = var("KARTULI_PORT") {
            match port.parse() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid KARTULI_PORT: {}", port),
            }
        }

        if let Some(dir) = var("KARTULI_STATIC_DIR") {
            config.server.static_dir = PathBuf::from(dir);
        }

        if let Some(level) = var("KARTULI_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(dir) = var("KARTULI_AUDIO_DIR") {
            config.speech.audio_dir = PathBuf::from(dir);
        }

        if let Some(model) = var("KARTULI_TTS_MODEL") {
            config.speech.model = model;
        }

        if let Some(voice) = var("KARTULI_TTS_VOICE") {
            config.speech.voice = voice;
        }

        // A key in the environment switches speech on unless explicitly disabled
        if let Some(key) = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")) {
            config.speech.api_key = Some(key);
            config.speech.enabled = true;
        }

        if let Some(enabled) = var("KARTULI_SPEECH_ENABLED") {
            config.speech.enabled = enabled.parse().unwrap_or(config.speech.enabled);
        }
    }

    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(KartuliError::Config(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            ))
            .into());
        }

        if self.server.port == 0 {
            return Err(KartuliError::Config("Server port must be non-zero".into()).into());
        }

        if self.speech.history_limit == 0 {
            return Err(
                KartuliError::Config("speech.history_limit must be at least 1".into()).into(),
            );
        }

        if self.speech.enabled && !self.speech.is_active() {
            return Err(KartuliError::Config(
                "Speech synthesis is enabled but no API key is set (GEMINI_API_KEY or speech.api_key)"
                    .into(),
            )
            .into());
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}
