use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Recognition, RecognitionConfig, SpeechError, SpeechProvider};

const DEFAULT_BASE_URL: &str = "https://speech.googleapis.com";

/// Google Cloud Speech synchronous recognition over REST.
pub struct GoogleSpeechClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleSpeechClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        let endpoint = format!("{}/v1/speech:recognize", base_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeConfig<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
}

#[derive(Serialize)]
struct RecognizeAudio {
    content: String,
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    config: RecognizeConfig<'a>,
    audio: RecognizeAudio,
}

#[derive(Deserialize)]
struct RecognizeAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

#[derive(Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[async_trait]
impl SpeechProvider for GoogleSpeechClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn recognize(
        &self,
        audio: &[u8],
        config: &RecognitionConfig,
    ) -> Result<Recognition, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::NotConfigured)?;

        let body = RecognizeRequest {
            config: RecognizeConfig {
                encoding: config.encoding.as_str(),
                sample_rate_hertz: config.sample_rate_hz,
                language_code: &config.language_code,
            },
            audio: RecognizeAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        };

        tracing::debug!(endpoint = %self.endpoint, "Sending audio to Cloud Speech");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpeechError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let result: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("parse response: {}", e)))?;

        // An empty result set is the API's "no speech recognized" answer.
        let alternative = result
            .results
            .into_iter()
            .next()
            .and_then(|r| r.alternatives.into_iter().next());

        let recognition = match alternative {
            Some(alt) => Recognition {
                transcript: alt.transcript.trim().to_string(),
                confidence: alt.confidence,
            },
            None => Recognition {
                transcript: String::new(),
                confidence: Some(0.0),
            },
        };

        tracing::info!(
            chars = recognition.transcript.len(),
            "Cloud Speech recognition completed"
        );

        Ok(recognition)
    }
}
