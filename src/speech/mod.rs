//! Speech synthesis and audio history.
//!
//! [`Synthesizer`] sends already-transformed text to the TTS provider and
//! stores the result through [`AudioStore`].

mod service;
pub mod store;
pub mod wav;

pub use service::SpeechClient;
pub use store::{AudioRecord, AudioStore, SavedAudio};

use std::sync::Arc;

use crate::config::SpeechConfig;
use crate::error::Result;

pub struct Synthesizer {
    client: SpeechClient,
    store: Arc<AudioStore>,
}

impl Synthesizer {
    pub fn new(client: SpeechClient, store: Arc<AudioStore>) -> Self {
        Self { client, store }
    }

    /// `None` when speech is switched off or has no key.
    pub fn from_config(config: &SpeechConfig, store: Arc<AudioStore>) -> Result<Option<Self>> {
        if !config.is_active() {
            return Ok(None);
        }
        Ok(Some(Self::new(SpeechClient::from_config(config)?, store)))
    }

    /// Synthesize `text` verbatim and save it as the next numbered WAV file.
    pub async fn speak(&self, text: &str) -> Result<SavedAudio> {
        let pcm = self.client.synthesize(text).await?;
        self.store.save_pcm(pcm).await
    }
}
