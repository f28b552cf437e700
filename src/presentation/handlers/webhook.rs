use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::application::ports::PersistenceError;
use crate::domain::{Destination, Job};
use crate::presentation::state::AppState;

/// Webhook delivery from the chat platform. Signature verification happens
/// upstream of this service; the handler only parses events.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub message: Option<EventMessage>,
    pub source: Option<EventSource>,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

/// Queue a PENDING job per audio message event and acknowledge immediately.
/// The worker picks the job up on a later tick; nothing is transcribed
/// inside the request.
pub async fn webhook_handler(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> StatusCode {
    for event in payload.events {
        if event.event_type != "message" {
            continue;
        }
        let Some(message) = event.message else {
            continue;
        };
        if message.message_type != "audio" {
            continue;
        }
        let Some(source) = event.source else {
            tracing::warn!(message_id = %message.id, "Audio event without source, skipping");
            continue;
        };

        let destination =
            match Destination::from_columns(source.user_id, source.group_id, source.room_id) {
                Ok(destination) => destination,
                Err(e) => {
                    tracing::warn!(message_id = %message.id, error = %e, "Undeliverable event, skipping");
                    continue;
                }
            };

        let job = Job::new(message.id.clone(), destination);
        match state.job_store.create(&job).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, message_id = %job.message_id, "Transcription job queued");
            }
            Err(PersistenceError::ConstraintViolation(_)) => {
                tracing::debug!(message_id = %job.message_id, "Duplicate delivery ignored");
            }
            Err(e) => {
                // Still acknowledged: the platform retries whole deliveries,
                // not individual events, and a retry storm helps nobody.
                tracing::error!(message_id = %job.message_id, error = %e, "Failed to queue job");
            }
        }
    }

    StatusCode::OK
}
