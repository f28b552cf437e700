use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{
    RecognitionConfig, SpeechProvider, TranscriptionClient, TranscriptionError,
};
use crate::domain::{ProviderTag, Transcription};

/// Used when the winning provider reports no score for its top alternative.
const PLACEHOLDER_CONFIDENCE: f32 = 1.0;

/// Ordered failover chain over speech providers.
///
/// The primary is always preferred when it answers, regardless of historical
/// accuracy; the chain is pure failover, not a quality-based choice. Every
/// attempt's error (unconfigured providers included) is remembered and
/// folded into a single aggregate error when the chain is exhausted.
pub struct FailoverSpeechClient {
    attempts: Vec<(ProviderTag, Arc<dyn SpeechProvider>)>,
}

impl FailoverSpeechClient {
    pub fn new(primary: Arc<dyn SpeechProvider>, secondary: Arc<dyn SpeechProvider>) -> Self {
        Self {
            attempts: vec![
                (ProviderTag::Primary, primary),
                (ProviderTag::Secondary, secondary),
            ],
        }
    }
}

#[async_trait]
impl TranscriptionClient for FailoverSpeechClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        config: &RecognitionConfig,
    ) -> Result<Transcription, TranscriptionError> {
        let mut failures = Vec::with_capacity(self.attempts.len());

        for (tag, provider) in &self.attempts {
            match provider.recognize(audio, config).await {
                Ok(recognition) => {
                    return Ok(Transcription {
                        text: recognition.transcript,
                        confidence: recognition.confidence.unwrap_or(PLACEHOLDER_CONFIDENCE),
                        provider: *tag,
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = %tag, error = %e, "Speech provider failed");
                    failures.push(format!("{}: {}", tag, e));
                }
            }
        }

        Err(TranscriptionError(failures.join("; ")))
    }
}
