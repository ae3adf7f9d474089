//! Request/response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /transform`.
#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    #[serde(rename = "inputText")]
    pub input_text: String,
}

/// Reply to `POST /transform`. `audio_url` only appears when synthesis ran.
#[derive(Debug, Serialize)]
pub struct TransformResponse {
    pub transformed_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always "ready" once the listener is up
    pub status: String,
    pub version: String,
    pub speech_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Codes for failures that happen before any domain logic runs.
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
}
