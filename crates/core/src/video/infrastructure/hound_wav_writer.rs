use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::shared::audio_segment::AudioSegment;
use crate::video::domain::audio_writer::AudioWriter;
use crate::video::domain::extract_error::ExtractError;

/// Writes the recognizer waveform as a mono 16-bit PCM WAV file.
pub struct HoundWavWriter;

impl AudioWriter for HoundWavWriter {
    fn write_wav(&self, path: &Path, audio: &AudioSegment) -> Result<(), ExtractError> {
        let encode_err = |e: hound::Error| ExtractError::Encode {
            path: path.to_path_buf(),
            source: e.into(),
        };

        let spec = WavSpec {
            channels: 1,
            sample_rate: audio.sample_rate(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec).map_err(encode_err)?;
        for &sample in audio.samples() {
            writer.write_sample(sample).map_err(encode_err)?;
        }
        writer.finalize().map_err(encode_err)?;
        Ok(())
    }
}
