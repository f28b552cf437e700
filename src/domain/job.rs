use chrono::{DateTime, Utc};

use super::{Destination, JobId, JobStatus, ProviderTag};

/// One transcription request and its full lifecycle record.
///
/// Rows are never deleted; terminal rows stay behind as audit records, and
/// timed-out work is reattempted through a fresh successor row linked via
/// `previous_job_id` rather than resumed in place.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub message_id: String,
    pub destination: Destination,
    pub status: JobStatus,
    pub transcript: Option<String>,
    pub confidence: Option<f32>,
    pub provider: Option<ProviderTag>,
    pub audio_file_path: Option<String>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub previous_job_id: Option<JobId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(message_id: String, destination: Destination) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            message_id,
            destination,
            status: JobStatus::Pending,
            transcript: None,
            confidence: None,
            provider: None,
            audio_file_path: None,
            error_message: None,
            retry_count: 0,
            previous_job_id: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// A fresh PENDING successor for an abandoned job.
    pub fn retry_of(abandoned: &Job) -> Self {
        let mut job = Job::new(abandoned.message_id.clone(), abandoned.destination.clone());
        job.retry_count = abandoned.retry_count + 1;
        job.previous_job_id = Some(abandoned.id);
        job
    }
}
