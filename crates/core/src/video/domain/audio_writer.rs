use std::path::Path;

use crate::shared::audio_segment::AudioSegment;
use crate::video::domain::extract_error::ExtractError;

/// Domain interface for writing the recognizer-ready waveform artifact.
pub trait AudioWriter: Send {
    /// Write `audio` as mono 16-bit signed PCM WAV at `path`, overwriting
    /// any existing file.
    fn write_wav(&self, path: &Path, audio: &AudioSegment) -> Result<(), ExtractError>;
}
