use std::path::Path;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("transcoder unavailable: {0}")]
    TranscoderUnavailable(String),
    #[error("transcode failed: {0}")]
    TranscodeFailed(String),
}

/// External process that rewrites audio into the PCM form the speech
/// providers require (mono, 16 kHz, 16-bit linear).
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn transcode_to_wav(&self, input: &Path, output: &Path)
        -> Result<(), ConversionError>;
}
