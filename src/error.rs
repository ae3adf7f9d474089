//! Error types.
//!
//! The text pipeline cannot fail; everything here comes from the speech
//! provider, the audio directory or configuration.

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KartuliError>;

#[derive(Error, Debug)]
pub enum KartuliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech provider error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Speech {
        status: Option<u16>,
        message: String,
    },

    #[error("invalid base64 audio payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("speech synthesis is disabled")]
    SpeechDisabled,
}

/// Stable machine-readable codes returned in HTTP error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    IoError,
    SpeechError,
    SpeechDisabled,
    ConfigError,
    InvalidAudio,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::SpeechError => "SPEECH_ERROR",
            ErrorCode::SpeechDisabled => "SPEECH_DISABLED",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InvalidAudio => "INVALID_AUDIO",
        }
    }
}

impl KartuliError {
    pub fn speech(status: Option<u16>, message: impl Into<String>) -> Self {
        KartuliError::Speech {
            status,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            KartuliError::Io(_) => ErrorCode::IoError,
            KartuliError::Json(_) | KartuliError::Http(_) | KartuliError::Speech { .. } => {
                ErrorCode::SpeechError
            }
            KartuliError::Base64(_) | KartuliError::Wav(_) => ErrorCode::InvalidAudio,
            KartuliError::Config(_) => ErrorCode::ConfigError,
            KartuliError::SpeechDisabled => ErrorCode::SpeechDisabled,
        }
    }
}
