use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::{JobStore, JobUpdate, PersistenceError};
use crate::domain::{Job, JobId, JobStatus};

/// In-process job store with the same observable semantics as `PgJobStore`,
/// including the partial uniqueness rule on original message ids. Backs the
/// worker and webhook test suites.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: &Job) -> Result<(), PersistenceError> {
        let mut jobs = self
            .jobs
            .lock()
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;

        if job.retry_count == 0
            && jobs
                .values()
                .any(|j| j.retry_count == 0 && j.message_id == job.message_id)
        {
            return Err(PersistenceError::ConstraintViolation(format!(
                "duplicate message_id {}",
                job.message_id
            )));
        }

        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, PersistenceError> {
        let jobs = self
            .jobs
            .lock()
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;
        Ok(jobs.get(&id).cloned())
    }

    async fn update(&self, id: JobId, update: JobUpdate) -> Result<(), PersistenceError> {
        let mut jobs = self
            .jobs
            .lock()
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;

        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| PersistenceError::NotFound(format!("job {}", id)))?;

        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(transcript) = update.transcript {
            job.transcript = Some(transcript);
        }
        if let Some(confidence) = update.confidence {
            job.confidence = Some(confidence);
        }
        if let Some(provider) = update.provider {
            job.provider = Some(provider);
        }
        if let Some(audio_file_path) = update.audio_file_path {
            job.audio_file_path = Some(audio_file_path);
        }
        if let Some(error_message) = update.error_message {
            job.error_message = Some(error_message);
        }
        if let Some(completed_at) = update.completed_at {
            job.completed_at = Some(completed_at);
        }
        job.updated_at = Utc::now();

        Ok(())
    }

    async fn claimable_jobs(
        &self,
        limit: i64,
        processing_timeout: Duration,
    ) -> Result<Vec<Job>, PersistenceError> {
        let jobs = self
            .jobs
            .lock()
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;

        let stale_before =
            Utc::now() - chrono::Duration::seconds(processing_timeout.as_secs() as i64);

        let mut claimable: Vec<Job> = jobs
            .values()
            .filter(|j| {
                j.status == JobStatus::Pending
                    || (j.status == JobStatus::Processing && j.updated_at < stale_before)
            })
            .cloned()
            .collect();

        claimable.sort_by_key(|j| j.created_at);
        claimable.truncate(limit as usize);
        Ok(claimable)
    }
}
