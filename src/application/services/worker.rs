use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Utc};
use tokio::time::MissedTickBehavior;

use crate::application::ports::{ChatClient, JobStore, JobUpdate, PersistenceError};
use crate::domain::{Destination, Job, JobStatus};

use super::audio_pipeline::{AudioPipeline, AudioPipelineError};

const FALLBACK_SENDER_NAME: &str = "Voice message";
const NO_SPEECH_NOTICE: &str = "(no speech detected)";
const FAILURE_MESSAGE: &str = "Sorry, this voice message could not be transcribed.";

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub poll_interval: Duration,
    pub max_concurrent_jobs: i64,
    pub processing_timeout: Duration,
    pub language_code: String,
    /// Offset applied to the attribution timestamp shown to users.
    pub reply_utc_offset: FixedOffset,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("persistence: {0}")]
    Persistence(PersistenceError),
    #[error("pipeline: {0}")]
    Pipeline(AudioPipelineError),
}

/// Polls the job store on a fixed interval and drives claimed jobs through
/// download, conversion, transcription, notification and cleanup.
///
/// Ticks are strictly sequential: a tick's batch settles fully before the
/// next fetch, bounding in-flight work to `max_concurrent_jobs`.
pub struct TranscriptionWorker {
    store: Arc<dyn JobStore>,
    pipeline: Arc<AudioPipeline>,
    chat: Arc<dyn ChatClient>,
    config: WorkerConfig,
}

impl TranscriptionWorker {
    pub fn new(
        store: Arc<dyn JobStore>,
        pipeline: Arc<AudioPipeline>,
        chat: Arc<dyn ChatClient>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            store,
            pipeline,
            chat,
            config,
        }
    }

    pub async fn run(self) {
        tracing::info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            max_concurrent_jobs = self.config.max_concurrent_jobs,
            "Transcription worker started"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "Worker tick failed");
            }
        }
    }

    /// One scheduling pass: reclaim abandoned jobs, then process fresh ones
    /// concurrently. One job's failure never aborts its siblings.
    pub async fn tick(&self) -> Result<(), PersistenceError> {
        let claimable = self
            .store
            .claimable_jobs(self.config.max_concurrent_jobs, self.config.processing_timeout)
            .await?;

        if claimable.is_empty() {
            return Ok(());
        }

        let mut pending = Vec::new();
        for job in claimable {
            if job.status == JobStatus::Processing {
                // Picked up stale: requeue under a fresh identity; the
                // successor is claimed on a later tick.
                if let Err(e) = self.recover_timed_out(&job).await {
                    tracing::error!(job_id = %job.id, error = %e, "Timeout recovery failed");
                }
            } else {
                pending.push(job);
            }
        }

        let results =
            futures::future::join_all(pending.into_iter().map(|job| self.process_job(job))).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            processed = results.len() - failed,
            failed,
            "Worker tick complete"
        );

        Ok(())
    }

    async fn recover_timed_out(&self, job: &Job) -> Result<(), PersistenceError> {
        let minutes = self.config.processing_timeout.as_secs() / 60;
        self.store
            .update(
                job.id,
                JobUpdate::timed_out(format!(
                    "processing exceeded the {} minute timeout; requeued as a new job",
                    minutes
                )),
            )
            .await?;

        let successor = Job::retry_of(job);
        self.store.create(&successor).await?;

        tracing::warn!(
            job_id = %job.id,
            successor_id = %successor.id,
            retry_count = successor.retry_count,
            "Abandoned job requeued"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self, job), fields(job_id = %job.id, message_id = %job.message_id))]
    async fn process_job(&self, job: Job) -> Result<(), WorkerError> {
        let message_id = job.message_id.clone();
        let outcome = self.run_job(job).await;
        // Working files are transient state; delete them on every exit path.
        self.cleanup_working_files(&message_id).await;
        outcome
    }

    async fn run_job(&self, job: Job) -> Result<(), WorkerError> {
        self.store
            .update(job.id, JobUpdate::processing())
            .await
            .map_err(WorkerError::Persistence)?;

        match self
            .pipeline
            .process(&job.message_id, &self.config.language_code)
            .await
        {
            Ok(output) => {
                self.store
                    .update(
                        job.id,
                        JobUpdate::completed(
                            output.transcript.clone(),
                            output.confidence,
                            output.provider,
                            output.audio_file_path.display().to_string(),
                        ),
                    )
                    .await
                    .map_err(WorkerError::Persistence)?;

                tracing::info!(provider = %output.provider, "Transcription job completed");
                self.notify_success(&job.destination, &output.transcript).await;
                Ok(())
            }
            Err(e) => {
                let error_message = e.to_string();
                self.store
                    .update(job.id, JobUpdate::failed(error_message.clone()))
                    .await
                    .map_err(WorkerError::Persistence)?;

                tracing::error!(error = %error_message, "Transcription job failed");
                self.notify_failure(&job.destination).await;
                Err(WorkerError::Pipeline(e))
            }
        }
    }

    /// Deliver the transcript with attribution. Delivery is best-effort: a
    /// failed push is logged and never re-flips job status.
    async fn notify_success(&self, destination: &Destination, transcript: &str) {
        let display_name = match self.chat.display_name(destination).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(error = %e, "Profile lookup failed, using fallback name");
                FALLBACK_SENDER_NAME.to_string()
            }
        };

        let text = if transcript.is_empty() {
            NO_SPEECH_NOTICE
        } else {
            transcript
        };
        let local_time = Utc::now()
            .with_timezone(&self.config.reply_utc_offset)
            .format("%d/%m/%Y %H:%M");
        let message = format!("{} ({})\n{}", display_name, local_time, text);

        if let Err(e) = self
            .chat
            .push_text(destination.reply_target(), &message)
            .await
        {
            tracing::warn!(error = %e, "Failed to deliver transcript");
        }
    }

    /// Generic apology only; internal error detail stays in logs and the
    /// job row.
    async fn notify_failure(&self, destination: &Destination) {
        if let Err(e) = self
            .chat
            .push_text(destination.reply_target(), FAILURE_MESSAGE)
            .await
        {
            tracing::warn!(error = %e, "Failed to deliver failure notice");
        }
    }

    async fn cleanup_working_files(&self, message_id: &str) {
        let (raw, converted) = self.pipeline.working_paths(message_id);
        for path in [raw, converted] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Working file removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove working file")
                }
            }
        }
    }
}
