use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoder, ConversionError};

/// Transcodes audio to mono 16 kHz 16-bit linear PCM by invoking `ffmpeg`.
///
/// Hosts that cannot spawn subprocesses fail on the first invocation with
/// `ConversionError::TranscoderUnavailable` rather than hanging.
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode_to_wav(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<(), ConversionError> {
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            "Transcoding to 16 kHz mono WAV"
        );

        let result = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-ac", "1", "-ar", "16000", "-sample_fmt", "s16"])
            .arg(output)
            .output()
            .await;

        match result {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ConversionError::TranscoderUnavailable(format!(
                    "{} not found; install ffmpeg or set an explicit binary path \
                     (this host may not permit spawning subprocesses)",
                    self.binary
                )))
            }
            Err(e) => Err(ConversionError::TranscoderUnavailable(format!(
                "failed to spawn {}: {}",
                self.binary, e
            ))),
            Ok(output) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ConversionError::TranscodeFailed(format!(
                    "{} exited with {}: {}",
                    self.binary,
                    output.status,
                    stderr.trim()
                )))
            }
            Ok(_) => Ok(()),
        }
    }
}
