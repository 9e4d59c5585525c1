use thiserror::Error;

use crate::transcript::domain::transcript_sink::SinkError;

/// Failures of one continuous-recognition session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Credentials failed validation; nothing was sent to the service.
    #[error("speech credentials are incomplete: {0}")]
    AuthConfig(&'static str),

    /// The recognizer could not be constructed or connected. The session
    /// never leaves its starting state; restarting is a user action.
    #[error("failed to start recognition: {0}")]
    Init(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service terminated the session, carrying its reason. Segments
    /// already appended remain on disk.
    #[error("recognition canceled by service: {0}")]
    ServiceCanceled(String),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
