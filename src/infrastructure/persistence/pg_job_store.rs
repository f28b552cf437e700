use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobStore, JobUpdate, PersistenceError};
use crate::domain::{Destination, Job, JobId, JobStatus, ProviderTag};

const JOB_COLUMNS: &str = "id, message_id, user_id, group_id, room_id, status, transcript, \
     confidence, provider, audio_file_path, error_message, retry_count, previous_job_id, \
     created_at, updated_at, completed_at";

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_query_error(e: sqlx::Error) -> PersistenceError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PersistenceError::ConstraintViolation(db.to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            PersistenceError::ConnectionFailed(e.to_string())
        }
        _ => PersistenceError::QueryFailed(e.to_string()),
    }
}

fn map_row(row: &PgRow) -> Result<Job, PersistenceError> {
    let get = |e: sqlx::Error| PersistenceError::QueryFailed(e.to_string());

    let status: String = row.try_get("status").map_err(get)?;
    let status = status
        .parse::<JobStatus>()
        .map_err(PersistenceError::QueryFailed)?;

    let provider: Option<String> = row.try_get("provider").map_err(get)?;
    let provider = provider
        .map(|p| p.parse::<ProviderTag>())
        .transpose()
        .map_err(PersistenceError::QueryFailed)?;

    let destination = Destination::from_columns(
        row.try_get("user_id").map_err(get)?,
        row.try_get("group_id").map_err(get)?,
        row.try_get("room_id").map_err(get)?,
    )
    .map_err(PersistenceError::QueryFailed)?;

    let previous_job_id: Option<Uuid> = row.try_get("previous_job_id").map_err(get)?;

    Ok(Job {
        id: JobId::from_uuid(row.try_get("id").map_err(get)?),
        message_id: row.try_get("message_id").map_err(get)?,
        destination,
        status,
        transcript: row.try_get("transcript").map_err(get)?,
        confidence: row.try_get("confidence").map_err(get)?,
        provider,
        audio_file_path: row.try_get("audio_file_path").map_err(get)?,
        error_message: row.try_get("error_message").map_err(get)?,
        retry_count: row.try_get("retry_count").map_err(get)?,
        previous_job_id: previous_job_id.map(JobId::from_uuid),
        created_at: row.try_get("created_at").map_err(get)?,
        updated_at: row.try_get("updated_at").map_err(get)?,
        completed_at: row.try_get("completed_at").map_err(get)?,
    })
}

#[async_trait]
impl JobStore for PgJobStore {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), PersistenceError> {
        let (user_id, group_id, room_id) = job.destination.as_columns();

        sqlx::query(
            r#"
            INSERT INTO jobs (id, message_id, user_id, group_id, room_id, status, transcript,
                              confidence, provider, audio_file_path, error_message, retry_count,
                              previous_job_id, created_at, updated_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(&job.message_id)
        .bind(user_id)
        .bind(group_id)
        .bind(room_id)
        .bind(job.status.as_str())
        .bind(job.transcript.as_deref())
        .bind(job.confidence)
        .bind(job.provider.map(|p| p.as_str()))
        .bind(job.audio_file_path.as_deref())
        .bind(job.error_message.as_deref())
        .bind(job.retry_count)
        .bind(job.previous_job_id.map(|id| id.as_uuid()))
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(job.completed_at)
        .execute(&self.pool)
        .await
        .map_err(map_query_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, PersistenceError> {
        let row = sqlx::query(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error)?;

        row.as_ref().map(map_row).transpose()
    }

    #[instrument(skip(self, update), fields(job_id = %id))]
    async fn update(&self, id: JobId, update: JobUpdate) -> Result<(), PersistenceError> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = COALESCE($2, status),
                transcript = COALESCE($3, transcript),
                confidence = COALESCE($4, confidence),
                provider = COALESCE($5, provider),
                audio_file_path = COALESCE($6, audio_file_path),
                error_message = COALESCE($7, error_message),
                completed_at = COALESCE($8, completed_at),
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.transcript)
        .bind(update.confidence)
        .bind(update.provider.map(|p| p.as_str()))
        .bind(update.audio_file_path)
        .bind(update.error_message)
        .bind(update.completed_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_query_error)?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::NotFound(format!("job {}", id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn claimable_jobs(
        &self,
        limit: i64,
        processing_timeout: Duration,
    ) -> Result<Vec<Job>, PersistenceError> {
        let stale_before = Utc::now() - chrono::Duration::seconds(processing_timeout.as_secs() as i64);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM jobs
            WHERE status = 'PENDING' OR (status = 'PROCESSING' AND updated_at < $1)
            ORDER BY created_at ASC
            LIMIT $2
            "#,
            JOB_COLUMNS
        ))
        .bind(stale_before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_query_error)?;

        rows.iter().map(map_row).collect()
    }
}
