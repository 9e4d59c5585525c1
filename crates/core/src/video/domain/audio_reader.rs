use std::path::Path;
use std::time::Duration;

use crate::shared::audio_segment::AudioSegment;
use crate::video::domain::extract_error::ExtractError;

/// Domain interface for decoding the audio track of a video container.
pub trait AudioReader: Send {
    /// Decode the best audio track to mono PCM at `target_sample_rate`.
    /// Returns `Ok(None)` when the container has no audio track.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, ExtractError>;

    /// Total duration of the container. Read-only; independent of and not
    /// required by extraction.
    fn media_duration(&self, path: &Path) -> Result<Duration, ExtractError>;
}
