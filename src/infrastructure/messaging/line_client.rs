use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{ChatClient, DownloadError, NotificationError};
use crate::domain::Destination;

const DEFAULT_API_BASE: &str = "https://api.line.me";
const DEFAULT_DATA_API_BASE: &str = "https://api-data.line.me";

/// Messaging API client: voice content download, text push, profile lookup.
/// Message content lives on a separate data host from the rest of the API.
pub struct LineClient {
    client: reqwest::Client,
    api_base: String,
    data_api_base: String,
    channel_access_token: String,
}

impl LineClient {
    pub fn new(channel_access_token: String) -> Self {
        Self::with_base_urls(DEFAULT_API_BASE, DEFAULT_DATA_API_BASE, channel_access_token)
    }

    pub fn with_base_urls(
        api_base: &str,
        data_api_base: &str,
        channel_access_token: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            data_api_base: data_api_base.trim_end_matches('/').to_string(),
            channel_access_token,
        }
    }

    async fn fetch_display_name(&self, path: String) -> Result<String, NotificationError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Profile {
            display_name: String,
        }

        let response = self
            .client
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.channel_access_token)
            .send()
            .await
            .map_err(|e| NotificationError::ProfileUnavailable(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(NotificationError::ProfileUnavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let profile: Profile = response
            .json()
            .await
            .map_err(|e| NotificationError::ProfileUnavailable(format!("parse response: {}", e)))?;

        Ok(profile.display_name)
    }
}

#[async_trait]
impl ChatClient for LineClient {
    async fn download_content(&self, message_id: &str) -> Result<Bytes, DownloadError> {
        let url = format!(
            "{}/v2/bot/message/{}/content",
            self.data_api_base, message_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.channel_access_token)
            .send()
            .await
            .map_err(|e| DownloadError::RequestFailed(format!("request: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DownloadError::NotFound(format!(
                "message {} invalid or expired",
                message_id
            )));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DownloadError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| DownloadError::RequestFailed(format!("read body: {}", e)))
    }

    async fn push_text(&self, to: &str, text: &str) -> Result<(), NotificationError> {
        let url = format!("{}/v2/bot/message/push", self.api_base);
        let body = json!({
            "to": to,
            "messages": [{ "type": "text", "text": text }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.channel_access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(NotificationError::SendFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    async fn display_name(
        &self,
        destination: &Destination,
    ) -> Result<String, NotificationError> {
        match destination {
            Destination::User { user_id } => {
                self.fetch_display_name(format!("/v2/bot/profile/{}", user_id))
                    .await
            }
            Destination::Group {
                group_id,
                user_id: Some(user_id),
            } => {
                self.fetch_display_name(format!("/v2/bot/group/{}/member/{}", group_id, user_id))
                    .await
            }
            Destination::Room {
                room_id,
                user_id: Some(user_id),
            } => {
                self.fetch_display_name(format!("/v2/bot/room/{}/member/{}", room_id, user_id))
                    .await
            }
            _ => Err(NotificationError::ProfileUnavailable(
                "speaker unknown".to_string(),
            )),
        }
    }
}
