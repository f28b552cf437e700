use std::sync::Arc;

use crate::application::ports::SpeechProvider;
use crate::presentation::config::SpeechSettings;

use super::{AzureSpeechClient, FailoverSpeechClient, GoogleSpeechClient};

/// Wire the failover chain from settings: Cloud Speech primary, Azure
/// secondary. Unconfigured providers stay in the chain and fail over at
/// attempt time, so a partially configured deployment still runs.
pub fn speech_client_from_settings(settings: &SpeechSettings) -> FailoverSpeechClient {
    let primary: Arc<dyn SpeechProvider> =
        Arc::new(GoogleSpeechClient::new(settings.google_api_key.clone()));
    let secondary: Arc<dyn SpeechProvider> = Arc::new(AzureSpeechClient::new(
        settings.azure_speech_key.clone(),
        settings.azure_speech_region.clone(),
    ));

    tracing::info!(
        primary_configured = primary.is_configured(),
        secondary_configured = secondary.is_configured(),
        "Speech failover chain assembled"
    );

    FailoverSpeechClient::new(primary, secondary)
}
