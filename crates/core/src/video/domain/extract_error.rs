use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a video container into the recognizer waveform.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The container could not be opened or decoded as time-based media.
    #[error("cannot read media container {path}: {source}")]
    MediaRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The container opened but carries no decodable audio track.
    #[error("no decodable audio track in {0}")]
    MissingAudio(PathBuf),

    /// The waveform artifact could not be written.
    #[error("failed to write waveform {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_audio_message_names_the_file() {
        let err = ExtractError::MissingAudio(Path::new("clip.mp4").to_path_buf());
        assert!(err.to_string().contains("clip.mp4"));
    }
}
