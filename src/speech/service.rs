//! Gemini text-to-speech client.
//!
//! The provider returns raw little-endian 16-bit PCM (mono, 24 kHz) as base64
//! inside a `generateContent` response.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Deserialize;

use crate::config::SpeechConfig;
use crate::error::{KartuliError, Result};

/// Calls the speech provider. Cheap to clone; the HTTP client is shared.
#[derive(Clone)]
pub struct SpeechClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    voice: String,
}

impl SpeechClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            voice: voice.into(),
        })
    }

    pub fn from_config(config: &SpeechConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(KartuliError::SpeechDisabled)?;

        Self::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            config.voice.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Synthesize `text` and return the decoded PCM bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.voice }
                    }
                }
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(KartuliError::speech(Some(status.as_u16()), error_text));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            KartuliError::speech(None, format!("Failed to parse TTS response: {e}"))
        })?;

        let encoded = payload
            .audio_data()
            .ok_or_else(|| KartuliError::speech(None, "response contained no audio part"))?;
        let pcm = BASE64.decode(encoded)?;
        if pcm.is_empty() {
            return Err(KartuliError::speech(None, "provider returned empty audio"));
        }

        tracing::info!(
            "Gemini TTS: generated {} bytes of PCM for {} chars (voice={}, model={})",
            pcm.len(),
            text.chars().count(),
            self.voice,
            self.model,
        );

        Ok(pcm)
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

impl GenerateContentResponse {
    /// First inline audio payload across all candidates.
    fn audio_data(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
    }
}
