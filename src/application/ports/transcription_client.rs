use async_trait::async_trait;

use crate::domain::Transcription;

use super::RecognitionConfig;

/// Both providers unavailable or failed; carries every underlying message so
/// callers never need provider-specific error types.
#[derive(Debug, thiserror::Error)]
#[error("all speech providers failed: {0}")]
pub struct TranscriptionError(pub String);

/// What the audio pipeline consumes: a transcription attempt that has
/// already settled provider selection internally.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        config: &RecognitionConfig,
    ) -> Result<Transcription, TranscriptionError>;
}
