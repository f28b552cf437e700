use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    Linear16,
}

impl AudioEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    pub language_code: String,
    pub sample_rate_hz: u32,
    pub encoding: AudioEncoding,
}

impl RecognitionConfig {
    pub fn linear16(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            sample_rate_hz: 16_000,
            encoding: AudioEncoding::Linear16,
        }
    }
}

/// One provider's raw result. `confidence` is `None` when the API response
/// carries no score for the top alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub transcript: String,
    pub confidence: Option<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("provider not configured")]
    NotConfigured,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// A single speech-to-text backend. The failover chain decides ordering and
/// tags; providers only recognize.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Whether credentials are present. Unconfigured providers still sit in
    /// the chain and surface `SpeechError::NotConfigured` when attempted.
    fn is_configured(&self) -> bool;

    async fn recognize(
        &self,
        audio: &[u8],
        config: &RecognitionConfig,
    ) -> Result<Recognition, SpeechError>;
}
