use std::path::Path;
use std::time::Duration;

use crate::shared::audio_segment::AudioSegment;
use crate::video::domain::audio_reader::AudioReader;
use crate::video::domain::extract_error::ExtractError;

/// Decodes the audio track of a video container using ffmpeg-next.
///
/// Output is packed 16-bit mono at the requested sample rate, resampled by
/// libswresample from whatever the source codec delivers.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, ExtractError> {
        let read_err = |e: ffmpeg_next::Error| ExtractError::MediaRead {
            path: path.to_path_buf(),
            source: e.into(),
        };

        ffmpeg_next::init().map_err(read_err)?;

        let mut ictx = ffmpeg_next::format::input(path).map_err(read_err)?;

        let audio_stream = match ictx.streams().best(ffmpeg_next::media::Type::Audio) {
            Some(stream) => stream,
            None => return Ok(None),
        };

        let audio_stream_index = audio_stream.index();
        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())
                .map_err(read_err)?;
        let mut decoder = codec_ctx.decoder().audio().map_err(read_err)?;

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            ffmpeg_next::format::Sample::I16(ffmpeg_next::format::sample::Type::Packed),
            ffmpeg_next::ChannelLayout::MONO,
            target_sample_rate,
        )
        .map_err(read_err)?;

        let mut samples: Vec<i16> = Vec::new();
        let mut decoded = ffmpeg_next::util::frame::audio::Audio::empty();
        let mut resampled = ffmpeg_next::util::frame::audio::Audio::empty();

        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }

            decoder.send_packet(&packet).map_err(read_err)?;
            while decoder.receive_frame(&mut decoded).is_ok() {
                resampler.run(&decoded, &mut resampled).map_err(read_err)?;
                collect_i16_samples(&resampled, &mut samples);
            }
        }

        // Drain the decoder, then the resampler's internal buffer.
        decoder.send_eof().map_err(read_err)?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            resampler.run(&decoded, &mut resampled).map_err(read_err)?;
            collect_i16_samples(&resampled, &mut samples);
        }
        if let Ok(Some(delay)) = resampler.flush(&mut resampled) {
            if delay.output > 0 {
                collect_i16_samples(&resampled, &mut samples);
            }
        }

        Ok(Some(AudioSegment::new(samples, target_sample_rate)))
    }

    fn media_duration(&self, path: &Path) -> Result<Duration, ExtractError> {
        let read_err = |e: ffmpeg_next::Error| ExtractError::MediaRead {
            path: path.to_path_buf(),
            source: e.into(),
        };

        ffmpeg_next::init().map_err(read_err)?;
        let ictx = ffmpeg_next::format::input(path).map_err(read_err)?;

        // Input::duration is in AV_TIME_BASE (microsecond) units; negative
        // when the container does not declare one.
        let micros = ictx.duration();
        if micros < 0 {
            return Ok(Duration::ZERO);
        }
        Ok(Duration::from_micros(micros as u64))
    }
}

/// Copy packed mono i16 samples out of a resampled frame.
fn collect_i16_samples(frame: &ffmpeg_next::util::frame::audio::Audio, out: &mut Vec<i16>) {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return;
    }
    let data = frame.data(0);
    let ints = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const i16, num_samples) };
    out.extend_from_slice(ints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn nonexistent_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("Z:\\nonexistent\\file.mp4")
        } else {
            Path::new("/nonexistent/file.mp4")
        }
    }

    #[test]
    fn test_read_audio_nonexistent_file() {
        let reader = FfmpegAudioReader;
        let result = reader.read_audio(nonexistent_path(), 16000);
        assert!(matches!(result, Err(ExtractError::MediaRead { .. })));
    }

    #[test]
    fn test_media_duration_nonexistent_file() {
        let reader = FfmpegAudioReader;
        let result = reader.media_duration(nonexistent_path());
        assert!(matches!(result, Err(ExtractError::MediaRead { .. })));
    }

    #[test]
    fn test_read_audio_garbage_container() {
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(b"this is not a media container").unwrap();
        let reader = FfmpegAudioReader;
        let result = reader.read_audio(file.path(), 16000);
        assert!(matches!(result, Err(ExtractError::MediaRead { .. })));
    }
}
