use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::constants::{RECOGNIZER_SAMPLE_RATE, WAVEFORM_EXTENSION};
use crate::video::domain::audio_reader::AudioReader;
use crate::video::domain::audio_writer::AudioWriter;
use crate::video::domain::extract_error::ExtractError;

/// Produces the recognizer-ready waveform for a video: decode the audio
/// track, resample to mono 16 kHz, write `<stem>.wav` next to the source,
/// overwriting a previous artifact.
pub struct ExtractAudioUseCase {
    reader: Box<dyn AudioReader>,
    writer: Box<dyn AudioWriter>,
}

impl ExtractAudioUseCase {
    pub fn new(reader: Box<dyn AudioReader>, writer: Box<dyn AudioWriter>) -> Self {
        Self { reader, writer }
    }

    /// Extract and return the waveform path.
    pub fn run(&self, video_path: &Path) -> Result<PathBuf, ExtractError> {
        let audio = self
            .reader
            .read_audio(video_path, RECOGNIZER_SAMPLE_RATE)?
            .ok_or_else(|| ExtractError::MissingAudio(video_path.to_path_buf()))?;

        let audio_path = video_path.with_extension(WAVEFORM_EXTENSION);
        self.writer.write_wav(&audio_path, &audio)?;
        Ok(audio_path)
    }

    /// Container duration for informational display. Read-only; performs no
    /// extraction.
    pub fn source_duration(&self, video_path: &Path) -> Result<Duration, ExtractError> {
        self.reader.media_duration(video_path)
    }
}
