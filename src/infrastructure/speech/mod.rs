mod azure_speech_client;
mod failover;
mod google_speech_client;
mod speech_client_factory;

pub use azure_speech_client::AzureSpeechClient;
pub use failover::FailoverSpeechClient;
pub use google_speech_client::GoogleSpeechClient;
pub use speech_client_factory::speech_client_from_settings;
