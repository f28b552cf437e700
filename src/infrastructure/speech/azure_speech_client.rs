use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{Recognition, RecognitionConfig, SpeechError, SpeechProvider};

const RECOGNITION_PATH: &str = "/speech/recognition/conversation/cognitiveservices/v1";

/// Azure Cognitive Services short-audio speech recognition over REST.
pub struct AzureSpeechClient {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl AzureSpeechClient {
    pub fn new(api_key: Option<String>, region: Option<String>) -> Self {
        let endpoint = region
            .map(|r| format!("https://{}.stt.speech.microsoft.com{}", r, RECOGNITION_PATH));
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: Some(format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                RECOGNITION_PATH
            )),
            api_key,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureNBest {
    confidence: Option<f32>,
    display: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureRecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: Option<String>,
    #[serde(default, rename = "NBest")]
    n_best: Vec<AzureNBest>,
}

#[async_trait]
impl SpeechProvider for AzureSpeechClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.endpoint.is_some()
    }

    async fn recognize(
        &self,
        audio: &[u8],
        config: &RecognitionConfig,
    ) -> Result<Recognition, SpeechError> {
        let (api_key, endpoint) = match (self.api_key.as_deref(), self.endpoint.as_deref()) {
            (Some(key), Some(endpoint)) => (key, endpoint),
            _ => return Err(SpeechError::NotConfigured),
        };

        let content_type = format!(
            "audio/wav; codecs=audio/pcm; samplerate={}",
            config.sample_rate_hz
        );

        tracing::debug!(endpoint, "Sending audio to Azure Speech");

        let response = self
            .client
            .post(endpoint)
            .query(&[
                ("language", config.language_code.as_str()),
                ("format", "detailed"),
            ])
            .header("Ocp-Apim-Subscription-Key", api_key)
            .header("Content-Type", content_type)
            .body(audio.to_vec())
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

        let result: AzureRecognitionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("parse response: {}", e)))?;

        match result.recognition_status.as_str() {
            "Success" => {
                let best = result.n_best.into_iter().next();
                let transcript = result
                    .display_text
                    .or_else(|| best.as_ref().and_then(|b| b.display.clone()))
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                let confidence = best.and_then(|b| b.confidence);

                tracing::info!(chars = transcript.len(), "Azure Speech recognition completed");

                Ok(Recognition {
                    transcript,
                    confidence,
                })
            }
            "NoMatch" | "InitialSilenceTimeout" => Ok(Recognition {
                transcript: String::new(),
                confidence: Some(0.0),
            }),
            other => Err(SpeechError::InvalidResponse(format!(
                "recognition status {}",
                other
            ))),
        }
    }
}
