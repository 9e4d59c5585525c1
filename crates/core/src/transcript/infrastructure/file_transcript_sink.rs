use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::recognition::domain::transcript_segment::TranscriptSegment;
use crate::shared::constants::{SNAPSHOT_EXTENSION, TRANSCRIPT_EXTENSION};
use crate::transcript::domain::transcript_sink::{SinkError, TranscriptSink};

/// File-backed sink: an append-only text transcript plus a replace-whole
/// JSON snapshot, both named after the video.
///
/// The text file is never truncated across runs; each run contributes a
/// blank-line-separated header block followed by its timestamped lines. The
/// snapshot holds the full ordered list of formatted lines and is replaced
/// atomically on finalize.
pub struct FileTranscriptSink {
    transcript_path: PathBuf,
    snapshot_path: PathBuf,
    started_at: String,
    header_written: bool,
}

impl FileTranscriptSink {
    /// Derive both artifact paths from the video location:
    /// `<stem>.txt` and `<stem>.transcript.json`.
    pub fn for_video(video_path: &Path) -> Self {
        Self::new(
            video_path.with_extension(TRANSCRIPT_EXTENSION),
            video_path.with_extension(SNAPSHOT_EXTENSION),
        )
    }

    pub fn new(transcript_path: PathBuf, snapshot_path: PathBuf) -> Self {
        Self {
            transcript_path,
            snapshot_path,
            started_at: Local::now().format("%Y%m%d_%H%M%S").to_string(),
            header_written: false,
        }
    }

    pub fn transcript_path(&self) -> &Path {
        &self.transcript_path
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    fn append_err(&self, source: std::io::Error) -> SinkError {
        SinkError::Append {
            path: self.transcript_path.clone(),
            source,
        }
    }

    fn snapshot_err(&self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> SinkError {
        SinkError::Snapshot {
            path: self.snapshot_path.clone(),
            source: source.into(),
        }
    }
}

impl TranscriptSink for FileTranscriptSink {
    fn append(&mut self, segment: &TranscriptSegment) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.transcript_path)
            .map_err(|e| self.append_err(e))?;

        if !self.header_written {
            write!(
                file,
                "\n\n\nTranscription started at {}\n\n\n",
                self.started_at
            )
            .map_err(|e| self.append_err(e))?;
            self.header_written = true;
        }

        writeln!(file, "{}", segment.formatted()).map_err(|e| self.append_err(e))?;
        Ok(())
    }

    fn finalize(&mut self, segments: &[TranscriptSegment]) -> Result<(), SinkError> {
        let lines: Vec<String> = segments.iter().map(TranscriptSegment::formatted).collect();
        let json = serde_json::to_string_pretty(&lines).map_err(|e| self.snapshot_err(e))?;

        // Write-then-rename so a crash never leaves a truncated snapshot.
        let temp = self.snapshot_path.with_extension("part");
        fs::write(&temp, json).map_err(|e| self.snapshot_err(e))?;
        fs::rename(&temp, &self.snapshot_path).map_err(|e| self.snapshot_err(e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn segment(secs: u64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(secs * 10_000_000, text)
    }

    #[test]
    fn test_for_video_derives_sibling_paths() {
        let sink = FileTranscriptSink::for_video(Path::new("/videos/demo.mp4"));
        assert_eq!(sink.transcript_path(), Path::new("/videos/demo.txt"));
        assert_eq!(
            sink.snapshot_path(),
            Path::new("/videos/demo.transcript.json")
        );
    }

    #[test]
    fn test_snapshots_are_per_video() {
        let a = FileTranscriptSink::for_video(Path::new("a.mp4"));
        let b = FileTranscriptSink::for_video(Path::new("b.mkv"));
        assert_ne!(a.snapshot_path(), b.snapshot_path());
    }

    #[test]
    fn test_first_append_writes_header_once() {
        let tmp = TempDir::new().unwrap();
        let mut sink = FileTranscriptSink::new(
            tmp.path().join("demo.txt"),
            tmp.path().join("demo.transcript.json"),
        );

        sink.append(&segment(1, "Hello world")).unwrap();
        sink.append(&segment(5, "Goodbye now")).unwrap();

        let text = fs::read_to_string(tmp.path().join("demo.txt")).unwrap();
        assert_eq!(text.matches("Transcription started at").count(), 1);
        assert!(text.ends_with("[00:00:01] Hello world\n[00:00:05] Goodbye now\n"));
        assert!(text.starts_with("\n\n\nTranscription started at "));
    }

    #[test]
    fn test_append_never_truncates_previous_runs() {
        let tmp = TempDir::new().unwrap();
        let transcript = tmp.path().join("demo.txt");
        let snapshot = tmp.path().join("demo.transcript.json");

        let mut first = FileTranscriptSink::new(transcript.clone(), snapshot.clone());
        first.append(&segment(1, "run one")).unwrap();

        let mut second = FileTranscriptSink::new(transcript.clone(), snapshot);
        second.append(&segment(2, "run two")).unwrap();

        let text = fs::read_to_string(&transcript).unwrap();
        assert!(text.contains("[00:00:01] run one"));
        assert!(text.contains("[00:00:02] run two"));
        assert_eq!(text.matches("Transcription started at").count(), 2);
    }

    #[test]
    fn test_no_append_leaves_transcript_untouched() {
        let tmp = TempDir::new().unwrap();
        let transcript = tmp.path().join("demo.txt");
        let mut sink = FileTranscriptSink::new(
            transcript.clone(),
            tmp.path().join("demo.transcript.json"),
        );

        sink.finalize(&[]).unwrap();
        assert!(!transcript.exists());
    }

    #[test]
    fn test_finalize_snapshots_all_segments_including_blanks() {
        let tmp = TempDir::new().unwrap();
        let snapshot = tmp.path().join("demo.transcript.json");
        let mut sink = FileTranscriptSink::new(tmp.path().join("demo.txt"), snapshot.clone());

        sink.finalize(&[segment(1, "Hello world"), segment(3, ""), segment(5, "Goodbye now")])
            .unwrap();

        let lines: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&snapshot).unwrap()).unwrap();
        assert_eq!(
            lines,
            vec![
                "[00:00:01] Hello world",
                "[00:00:03] ",
                "[00:00:05] Goodbye now"
            ]
        );
    }

    #[test]
    fn test_finalize_is_idempotent_byte_for_byte() {
        let tmp = TempDir::new().unwrap();
        let snapshot = tmp.path().join("demo.transcript.json");
        let mut sink = FileTranscriptSink::new(tmp.path().join("demo.txt"), snapshot.clone());
        let segments = [segment(1, "a"), segment(2, "b")];

        sink.finalize(&segments).unwrap();
        let first = fs::read(&snapshot).unwrap();
        sink.finalize(&segments).unwrap();
        let second = fs::read(&snapshot).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_finalize_replaces_prior_snapshot_and_leaves_no_temp() {
        let tmp = TempDir::new().unwrap();
        let snapshot = tmp.path().join("demo.transcript.json");
        let mut sink = FileTranscriptSink::new(tmp.path().join("demo.txt"), snapshot.clone());

        sink.finalize(&[segment(1, "old")]).unwrap();
        sink.finalize(&[segment(2, "new")]).unwrap();

        let lines: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&snapshot).unwrap()).unwrap();
        assert_eq!(lines, vec!["[00:00:02] new"]);
        assert!(!snapshot.with_extension("part").exists());
    }
}
