use std::path::PathBuf;

use thiserror::Error;

use crate::recognition::domain::transcript_segment::TranscriptSegment;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to append to transcript {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Durable destination for recognized segments.
///
/// `append` must be incremental: a transcript in progress survives a crash
/// mid-run. `finalize` replaces the whole structured snapshot with the full
/// ordered sequence.
pub trait TranscriptSink: Send {
    fn append(&mut self, segment: &TranscriptSegment) -> Result<(), SinkError>;

    fn finalize(&mut self, segments: &[TranscriptSegment]) -> Result<(), SinkError>;
}
