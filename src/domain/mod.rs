mod destination;
mod job;
mod job_id;
mod job_status;
mod transcription;

pub use destination::Destination;
pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use transcription::{ProviderTag, Transcription};
