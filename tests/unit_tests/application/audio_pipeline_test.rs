use std::sync::Arc;

use saraphi::application::services::{AudioPipeline, AudioPipelineError};
use saraphi::domain::{ProviderTag, Transcription};

use crate::helpers::{StubChatClient, StubTranscoder, StubTranscriptionClient};

fn pipeline_with(
    chat: StubChatClient,
    transcoder: StubTranscoder,
    stt: StubTranscriptionClient,
    work_dir: &std::path::Path,
) -> AudioPipeline {
    AudioPipeline::new(
        Arc::new(chat),
        Arc::new(transcoder),
        Arc::new(stt),
        work_dir.to_path_buf(),
    )
}

#[tokio::test]
async fn given_valid_message_when_processed_then_both_working_files_are_left_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let work_dir = tmp.path().join("audio");
    let pipeline = pipeline_with(
        StubChatClient::default(),
        StubTranscoder::default(),
        StubTranscriptionClient::ok(Transcription {
            text: "hello world".to_string(),
            confidence: 0.92,
            provider: ProviderTag::Secondary,
        }),
        &work_dir,
    );

    let output = pipeline.process("m1", "th-TH").await.unwrap();

    assert_eq!(output.transcript, "hello world");
    assert_eq!(output.provider, ProviderTag::Secondary);
    assert_eq!(output.audio_file_path, work_dir.join("m1.m4a"));
    assert_eq!(output.converted_audio_path, work_dir.join("m1.wav"));
    assert!(output.audio_file_path.exists());
    assert!(output.converted_audio_path.exists());
}

#[tokio::test]
async fn given_download_failure_when_processed_then_nothing_is_written_to_the_work_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let work_dir = tmp.path().join("audio");
    let chat = StubChatClient {
        fail_download_for: vec!["m1".to_string()],
        ..StubChatClient::default()
    };
    let pipeline = pipeline_with(
        chat,
        StubTranscoder::default(),
        StubTranscriptionClient::err("unused"),
        &work_dir,
    );

    let result = pipeline.process("m1", "th-TH").await;

    assert!(matches!(result, Err(AudioPipelineError::Download(_))));
    assert!(!work_dir.exists());
}

#[tokio::test]
async fn given_transcoder_failure_when_processed_then_raw_file_survives_for_inspection() {
    let tmp = tempfile::tempdir().unwrap();
    let work_dir = tmp.path().join("audio");
    let pipeline = pipeline_with(
        StubChatClient::default(),
        StubTranscoder { fail: true },
        StubTranscriptionClient::err("unused"),
        &work_dir,
    );

    let result = pipeline.process("m1", "th-TH").await;

    assert!(matches!(result, Err(AudioPipelineError::Conversion(_))));
    assert!(work_dir.join("m1.m4a").exists());
    assert!(!work_dir.join("m1.wav").exists());
}

#[tokio::test]
async fn given_transcription_failure_when_processed_then_error_carries_provider_detail() {
    let tmp = tempfile::tempdir().unwrap();
    let work_dir = tmp.path().join("audio");
    let pipeline = pipeline_with(
        StubChatClient::default(),
        StubTranscoder::default(),
        StubTranscriptionClient::err("primary: timeout; secondary: quota"),
        &work_dir,
    );

    let err = pipeline.process("m1", "th-TH").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("primary: timeout"));
    assert!(message.contains("secondary: quota"));
}
