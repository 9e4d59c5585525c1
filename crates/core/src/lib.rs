//! Video transcription pipeline: deterministic audio extraction plus a
//! continuous speech-recognition session with durable, timestamped output.

pub mod pipeline;
pub mod recognition;
pub mod shared;
pub mod transcript;
pub mod video;
