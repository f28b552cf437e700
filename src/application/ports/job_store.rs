use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Job, JobId, JobStatus, ProviderTag};

use super::PersistenceError;

/// Partial update of a job row. Unset fields are left untouched;
/// `updated_at` is refreshed on every update regardless.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub transcript: Option<String>,
    pub confidence: Option<f32>,
    pub provider: Option<ProviderTag>,
    pub audio_file_path: Option<String>,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    pub fn processing() -> Self {
        Self {
            status: Some(JobStatus::Processing),
            ..Self::default()
        }
    }

    pub fn completed(
        transcript: String,
        confidence: f32,
        provider: ProviderTag,
        audio_file_path: String,
    ) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            transcript: Some(transcript),
            confidence: Some(confidence),
            provider: Some(provider),
            audio_file_path: Some(audio_file_path),
            completed_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn failed(error_message: String) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error_message: Some(error_message),
            completed_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Terminal staleness transition. `completed_at` stays unset: it marks
    /// COMPLETED/FAILED outcomes only.
    pub fn timed_out(error_message: String) -> Self {
        Self {
            status: Some(JobStatus::Timeout),
            error_message: Some(error_message),
            ..Self::default()
        }
    }
}

/// Durable record of transcription requests.
///
/// There is no atomic claim-and-lock: `claimable_jobs` followed by an
/// `update` to PROCESSING is two steps, and concurrent workers can observe
/// the same row. Accepted for the single-worker deployment this targets.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert the row as given. Duplicate original `message_id`s fail with
    /// `PersistenceError::ConstraintViolation`.
    async fn create(&self, job: &Job) -> Result<(), PersistenceError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, PersistenceError>;

    async fn update(&self, id: JobId, update: JobUpdate) -> Result<(), PersistenceError>;

    /// Up to `limit` jobs, oldest `created_at` first, that are PENDING or
    /// have sat in PROCESSING longer than `processing_timeout`. The stale
    /// branch is what recovers work abandoned by a crash mid-processing.
    async fn claimable_jobs(
        &self,
        limit: i64,
        processing_timeout: Duration,
    ) -> Result<Vec<Job>, PersistenceError>;
}
