mod chat_client;
mod job_store;
mod persistence_error;
mod speech_provider;
mod transcoder;
mod transcription_client;

pub use chat_client::{ChatClient, DownloadError, NotificationError};
pub use job_store::{JobStore, JobUpdate};
pub use persistence_error::PersistenceError;
pub use speech_provider::{AudioEncoding, Recognition, RecognitionConfig, SpeechError, SpeechProvider};
pub use transcoder::{AudioTranscoder, ConversionError};
pub use transcription_client::{TranscriptionClient, TranscriptionError};
