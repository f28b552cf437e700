mod audio_pipeline;
mod worker;

pub use audio_pipeline::{AudioPipeline, AudioPipelineError, PipelineOutput};
pub use worker::{TranscriptionWorker, WorkerConfig, WorkerError};
