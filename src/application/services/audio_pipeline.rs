use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{
    AudioTranscoder, ChatClient, ConversionError, DownloadError, RecognitionConfig,
    TranscriptionClient, TranscriptionError,
};
use crate::domain::ProviderTag;

/// Source container the platform delivers voice messages in.
const SOURCE_AUDIO_EXT: &str = "m4a";
const CONVERTED_AUDIO_EXT: &str = "wav";

#[derive(Debug)]
pub struct PipelineOutput {
    pub transcript: String,
    pub confidence: f32,
    pub provider: ProviderTag,
    pub audio_file_path: PathBuf,
    pub converted_audio_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioPipelineError {
    #[error("download: {0}")]
    Download(DownloadError),
    #[error("audio staging: {0}")]
    Staging(std::io::Error),
    #[error("conversion: {0}")]
    Conversion(ConversionError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
}

/// Fetches a voice message, stages it on disk, transcodes it to the PCM
/// form the speech providers expect, and transcribes it.
///
/// The pipeline leaves both working files behind so a caller can inspect
/// artifacts after a failure; deleting them is the caller's job.
pub struct AudioPipeline {
    chat: Arc<dyn ChatClient>,
    transcoder: Arc<dyn AudioTranscoder>,
    stt: Arc<dyn TranscriptionClient>,
    work_dir: PathBuf,
}

impl AudioPipeline {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        transcoder: Arc<dyn AudioTranscoder>,
        stt: Arc<dyn TranscriptionClient>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            chat,
            transcoder,
            stt,
            work_dir,
        }
    }

    /// The (raw, converted) file paths a message id maps to. Paths are keyed
    /// by message id, so no two jobs share a working file.
    pub fn working_paths(&self, message_id: &str) -> (PathBuf, PathBuf) {
        (
            self.work_dir
                .join(format!("{}.{}", message_id, SOURCE_AUDIO_EXT)),
            self.work_dir
                .join(format!("{}.{}", message_id, CONVERTED_AUDIO_EXT)),
        )
    }

    pub async fn process(
        &self,
        message_id: &str,
        language_code: &str,
    ) -> Result<PipelineOutput, AudioPipelineError> {
        let audio = self
            .chat
            .download_content(message_id)
            .await
            .map_err(AudioPipelineError::Download)?;

        tracing::debug!(message_id, bytes = audio.len(), "Voice message downloaded");

        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(AudioPipelineError::Staging)?;

        let (audio_file_path, converted_audio_path) = self.working_paths(message_id);

        tokio::fs::write(&audio_file_path, &audio)
            .await
            .map_err(AudioPipelineError::Staging)?;

        self.transcoder
            .transcode_to_wav(&audio_file_path, &converted_audio_path)
            .await
            .map_err(AudioPipelineError::Conversion)?;

        let pcm = tokio::fs::read(&converted_audio_path)
            .await
            .map_err(AudioPipelineError::Staging)?;

        let config = RecognitionConfig::linear16(language_code);
        let transcription = self
            .stt
            .transcribe(&pcm, &config)
            .await
            .map_err(AudioPipelineError::Transcription)?;

        tracing::debug!(
            message_id,
            provider = %transcription.provider,
            chars = transcription.text.len(),
            "Transcription produced"
        );

        Ok(PipelineOutput {
            transcript: transcription.text,
            confidence: transcription.confidence,
            provider: transcription.provider,
            audio_file_path,
            converted_audio_path,
        })
    }
}
