use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use saraphi::application::ports::{
    AudioTranscoder, ChatClient, ConversionError, DownloadError, NotificationError, Recognition,
    RecognitionConfig, SpeechError, SpeechProvider, TranscriptionClient, TranscriptionError,
};
use saraphi::domain::{Destination, Transcription};

/// Serve `app` on an ephemeral local port until the returned sender fires.
pub async fn start_mock_server(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

/// Chat platform double. Downloads succeed with canned bytes unless the
/// message id is in the failure set; every push is recorded.
pub struct StubChatClient {
    pub audio: Bytes,
    pub fail_download_for: Vec<String>,
    pub fail_pushes: bool,
    pub display_name: Option<String>,
    pub pushes: Mutex<Vec<(String, String)>>,
}

impl Default for StubChatClient {
    fn default() -> Self {
        Self {
            audio: Bytes::from_static(b"fake m4a bytes"),
            fail_download_for: Vec::new(),
            fail_pushes: false,
            display_name: Some("Somchai".to_string()),
            pushes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatClient for StubChatClient {
    async fn download_content(&self, message_id: &str) -> Result<Bytes, DownloadError> {
        if self.fail_download_for.iter().any(|m| m == message_id) {
            return Err(DownloadError::NotFound(format!(
                "message {} invalid or expired",
                message_id
            )));
        }
        Ok(self.audio.clone())
    }

    async fn push_text(&self, to: &str, text: &str) -> Result<(), NotificationError> {
        if self.fail_pushes {
            return Err(NotificationError::SendFailed("status 500".to_string()));
        }
        self.pushes
            .lock()
            .unwrap()
            .push((to.to_string(), text.to_string()));
        Ok(())
    }

    async fn display_name(
        &self,
        _destination: &Destination,
    ) -> Result<String, NotificationError> {
        self.display_name
            .clone()
            .ok_or_else(|| NotificationError::ProfileUnavailable("status 404".to_string()))
    }
}

/// Transcoder double: copies the input file so the pipeline has a converted
/// file to read, or fails without touching the output.
pub struct StubTranscoder {
    pub fail: bool,
}

impl Default for StubTranscoder {
    fn default() -> Self {
        Self { fail: false }
    }
}

#[async_trait]
impl AudioTranscoder for StubTranscoder {
    async fn transcode_to_wav(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<(), ConversionError> {
        if self.fail {
            return Err(ConversionError::TranscodeFailed(
                "ffmpeg exited with 1: bad input".to_string(),
            ));
        }
        tokio::fs::copy(input, output)
            .await
            .map_err(|e| ConversionError::TranscodeFailed(e.to_string()))?;
        Ok(())
    }
}

/// Transcription double with a fixed outcome.
pub enum StubTranscriptionOutcome {
    Ok(Transcription),
    Err(String),
}

pub struct StubTranscriptionClient {
    pub outcome: StubTranscriptionOutcome,
}

impl StubTranscriptionClient {
    pub fn ok(transcription: Transcription) -> Self {
        Self {
            outcome: StubTranscriptionOutcome::Ok(transcription),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            outcome: StubTranscriptionOutcome::Err(message.to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionClient for StubTranscriptionClient {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _config: &RecognitionConfig,
    ) -> Result<Transcription, TranscriptionError> {
        match &self.outcome {
            StubTranscriptionOutcome::Ok(t) => Ok(t.clone()),
            StubTranscriptionOutcome::Err(m) => Err(TranscriptionError(m.clone())),
        }
    }
}

/// Speech provider double; counts how often it is attempted.
pub enum StubProviderBehavior {
    Recognize(Recognition),
    Fail(String),
    NotConfigured,
}

pub struct StubSpeechProvider {
    pub behavior: StubProviderBehavior,
    pub calls: Mutex<usize>,
}

impl StubSpeechProvider {
    pub fn recognizing(transcript: &str, confidence: Option<f32>) -> Self {
        Self {
            behavior: StubProviderBehavior::Recognize(Recognition {
                transcript: transcript.to_string(),
                confidence,
            }),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behavior: StubProviderBehavior::Fail(message.to_string()),
            calls: Mutex::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            behavior: StubProviderBehavior::NotConfigured,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SpeechProvider for StubSpeechProvider {
    fn is_configured(&self) -> bool {
        !matches!(self.behavior, StubProviderBehavior::NotConfigured)
    }

    async fn recognize(
        &self,
        _audio: &[u8],
        _config: &RecognitionConfig,
    ) -> Result<Recognition, SpeechError> {
        *self.calls.lock().unwrap() += 1;
        match &self.behavior {
            StubProviderBehavior::Recognize(r) => Ok(r.clone()),
            StubProviderBehavior::Fail(m) => Err(SpeechError::ApiRequestFailed(m.clone())),
            StubProviderBehavior::NotConfigured => Err(SpeechError::NotConfigured),
        }
    }
}
