use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::Destination;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("content request failed: {0}")]
    RequestFailed(String),
    #[error("message content unavailable: {0}")]
    NotFound(String),
}

/// Best-effort delivery failures. Logged by callers, never fatal to a job.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("message send failed: {0}")]
    SendFailed(String),
    #[error("profile lookup failed: {0}")]
    ProfileUnavailable(String),
}

/// The chat platform's Messaging API as the worker consumes it.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Raw audio bytes of a voice message. Invalid or expired message ids
    /// surface as `DownloadError::NotFound`.
    async fn download_content(&self, message_id: &str) -> Result<Bytes, DownloadError>;

    async fn push_text(&self, to: &str, text: &str) -> Result<(), NotificationError>;

    /// Display name of the speaker behind `destination`, resolved through
    /// the profile endpoint matching the source kind.
    async fn display_name(&self, destination: &Destination)
        -> Result<String, NotificationError>;
}
