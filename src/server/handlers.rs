//! Request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::types::{
    ErrorResponse, StatusResponse, TransformRequest, TransformResponse, error_codes,
};
use crate::error::KartuliError;
use crate::phonology::transform_detailed;
use crate::speech::{AudioStore, Synthesizer};

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Shared handler state.
pub struct AppState {
    pub store: Arc<AudioStore>,
    pub synthesizer: Option<Synthesizer>,
    pub history_limit: usize,
}

impl IntoResponse for KartuliError {
    fn into_response(self) -> Response {
        let status = match &self {
            KartuliError::Speech { .. } | KartuliError::Http(_) => StatusCode::BAD_GATEWAY,
            KartuliError::SpeechDisabled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            code: self.code().as_str().to_string(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn bad_request(rejection: JsonRejection) -> Response {
    (
        rejection.status(),
        Json(ErrorResponse {
            error: rejection.body_text(),
            code: error_codes::INVALID_REQUEST.to_string(),
        }),
    )
        .into_response()
}

/// GET / - the single-page UI
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /transform - transform text, optionally synthesizing audio
///
/// Synthesis failures are logged and leave `audio_url` out; the text result
/// is still returned.
pub async fn transform(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(rejection),
    };

    let result = transform_detailed(&request.input_text);
    tracing::debug!(
        "Transformed {} chars -> {} chars ({} nasals inserted)",
        result.original.chars().count(),
        result.transformed.chars().count(),
        result.nasals_inserted,
    );

    let audio_url = match &state.synthesizer {
        Some(synth) if !result.transformed.trim().is_empty() => {
            match synth.speak(&result.transformed).await {
                Ok(saved) => Some(saved.url),
                Err(e) => {
                    tracing::warn!("Speech synthesis failed: {}", e);
                    None
                }
            }
        }
        _ => None,
    };

    let response = TransformResponse {
        transformed_text: result.transformed,
        audio_url,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /history - most recently generated audio files
pub async fn history(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.clone();
    let limit = state.history_limit;

    match tokio::task::spawn_blocking(move || store.recent(limit)).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            tracing::error!("History scan task failed: {}", e);
            KartuliError::Io(std::io::Error::other(e.to_string())).into_response()
        }
    }
}

/// GET /api/status - liveness and feature flags
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        speech_enabled: state.synthesizer.is_some(),
    })
}
