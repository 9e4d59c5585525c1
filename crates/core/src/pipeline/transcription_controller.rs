use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use thiserror::Error;

use crate::pipeline::extract_audio_use_case::ExtractAudioUseCase;
use crate::pipeline::run_logger::RunLogger;
use crate::recognition::domain::session_error::SessionError;
use crate::recognition::domain::speech_service::SpeechService;
use crate::recognition::session::{RecognitionSession, SessionOutcome};
use crate::shared::credentials::Credentials;
use crate::transcript::domain::transcript_sink::TranscriptSink;
use crate::transcript::infrastructure::file_transcript_sink::FileTranscriptSink;
use crate::video::domain::audio_reader::AudioReader;
use crate::video::domain::audio_writer::AudioWriter;
use crate::video::domain::extract_error::ExtractError;

/// Observable state of the controller's current (or last) run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Extracting,
    Recognizing,
    Completed,
    Cancelled,
    Failed,
}

impl RunStatus {
    fn is_active(self) -> bool {
        matches!(self, RunStatus::Extracting | RunStatus::Recognizing)
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    /// A run is still extracting or recognizing. Overlapping runs are
    /// rejected rather than left to race over shared artifacts.
    #[error("a transcription run is already in progress")]
    RunInProgress,
}

/// Failures crossing the run-worker boundary. Converted to a log line and a
/// terminal status; never retried.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Everything one run needs, supplied by the surface that starts it.
pub struct RunRequest {
    pub video_path: PathBuf,
    pub credentials: Credentials,
    pub reader: Box<dyn AudioReader>,
    pub writer: Box<dyn AudioWriter>,
    pub service: Box<dyn SpeechService>,
    /// Defaults to a `FileTranscriptSink` named after the video.
    pub sink: Option<Box<dyn TranscriptSink>>,
}

enum RunOutcome {
    Completed,
    Cancelled,
}

/// Orchestrates one transcription run at a time on a background worker:
/// extraction, then the recognition session, reporting progress through the
/// injected `RunLogger`. The invoking surface is never blocked; it observes
/// the terminal status on the receiver `start` hands back.
pub struct TranscriptionController {
    logger: Arc<dyn RunLogger>,
    inner: Arc<Mutex<ControllerInner>>,
}

struct ControllerInner {
    status: RunStatus,
    cancel: Option<Arc<AtomicBool>>,
}

impl TranscriptionController {
    pub fn new(logger: Arc<dyn RunLogger>) -> Self {
        Self {
            logger,
            inner: Arc::new(Mutex::new(ControllerInner {
                status: RunStatus::Idle,
                cancel: None,
            })),
        }
    }

    pub fn status(&self) -> RunStatus {
        self.inner.lock().unwrap().status
    }

    /// Begin a run on a background worker. Rejects overlap while a previous
    /// run is still active. The returned receiver yields the terminal status
    /// exactly once; the worker itself is never joined.
    pub fn start(&self, request: RunRequest) -> Result<Receiver<RunStatus>, ControllerError> {
        // Fresh token per run: a cancel aimed at an earlier run can never
        // leak into this one.
        let cancelled = Arc::new(AtomicBool::new(false));
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.status.is_active() {
                return Err(ControllerError::RunInProgress);
            }
            inner.status = RunStatus::Extracting;
            inner.cancel = Some(cancelled.clone());
        }

        let (done_tx, done_rx) = crossbeam_channel::bounded::<RunStatus>(1);
        let logger = self.logger.clone();
        let inner = self.inner.clone();

        thread::spawn(move || {
            let terminal = match run_pipeline(request, &logger, &cancelled, &inner) {
                Ok(RunOutcome::Completed) => {
                    logger.log("Transcription completed.");
                    RunStatus::Completed
                }
                Ok(RunOutcome::Cancelled) => {
                    logger.log("Transcription cancelled.");
                    RunStatus::Cancelled
                }
                Err(e) => {
                    logger.log(&format!("Error during processing: {e}"));
                    RunStatus::Failed
                }
            };
            inner.lock().unwrap().status = terminal;
            let _ = done_tx.send(terminal);
        });

        Ok(done_rx)
    }

    /// Advisory: the run exits at its next checkpoint. An in-flight blocking
    /// extraction or service call is not interrupted.
    pub fn cancel(&self) {
        self.logger.log("Stopping process...");
        if let Some(flag) = &self.inner.lock().unwrap().cancel {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

fn run_pipeline(
    request: RunRequest,
    logger: &Arc<dyn RunLogger>,
    cancelled: &Arc<AtomicBool>,
    inner: &Arc<Mutex<ControllerInner>>,
) -> Result<RunOutcome, RunError> {
    let RunRequest {
        video_path,
        credentials,
        reader,
        writer,
        service,
        sink,
    } = request;

    logger.log(&format!(
        "Starting transcription for {}",
        video_path.display()
    ));

    let extractor = ExtractAudioUseCase::new(reader, writer);

    // Informational only; a container that hides its duration does not
    // block the run.
    match extractor.source_duration(&video_path) {
        Ok(duration) => logger.log(&format!("Video duration: {}", format_duration(duration))),
        Err(e) => logger.log(&format!("Error reading video duration: {e}")),
    }

    let audio_path = extractor.run(&video_path)?;
    logger.log(&format!("Extracted audio to: {}", audio_path.display()));

    if cancelled.load(Ordering::Relaxed) {
        return Ok(RunOutcome::Cancelled);
    }

    inner.lock().unwrap().status = RunStatus::Recognizing;

    let sink = sink.unwrap_or_else(|| Box::new(FileTranscriptSink::for_video(&video_path)));
    let session = RecognitionSession::new(service, sink, logger.clone(), cancelled.clone());
    match session.run(&audio_path, &credentials)? {
        SessionOutcome::Completed { segments } => {
            logger.log(&format!("Recognized {segments} segments."));
            Ok(RunOutcome::Completed)
        }
        SessionOutcome::Cancelled => Ok(RunOutcome::Cancelled),
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
