use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;

use crate::pipeline::run_logger::RunLogger;
use crate::recognition::domain::session_error::SessionError;
use crate::recognition::domain::session_event::SessionEvent;
use crate::recognition::domain::speech_service::SpeechService;
use crate::recognition::domain::transcript_segment::TranscriptSegment;
use crate::shared::constants::{CANCEL_POLL_INTERVAL_MS, EVENT_CHANNEL_CAPACITY};
use crate::shared::credentials::Credentials;
use crate::transcript::domain::transcript_sink::TranscriptSink;

/// Lifecycle of one continuous-recognition run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Streaming,
    Stopping,
    Done,
}

/// How a session ended from the caller's point of view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The service signalled natural end-of-stream.
    Completed { segments: usize },
    /// The cancellation token was observed at a checkpoint.
    Cancelled,
}

/// How the event stream terminated.
enum Ending {
    Stopped,
    Canceled(String),
}

/// Owns one continuous-recognition run against the speech service.
///
/// The service adapter pushes events onto a bounded queue; the session
/// consumes them sequentially. Recognized utterances become
/// `TranscriptSegment`s, with non-blank ones appended to the sink as they
/// arrive so a transcript in progress survives a crash mid-run. The
/// service's stopped/canceled event is the sole end-of-stream signal. There
/// is no timeout on the terminal wait; callers needing a bound add their own.
///
/// Single-use: `run` consumes the session.
pub struct RecognitionSession {
    service: Box<dyn SpeechService>,
    sink: Box<dyn TranscriptSink>,
    logger: Arc<dyn RunLogger>,
    cancelled: Arc<AtomicBool>,
    state: SessionState,
    segments: Vec<TranscriptSegment>,
}

impl RecognitionSession {
    pub fn new(
        service: Box<dyn SpeechService>,
        sink: Box<dyn TranscriptSink>,
        logger: Arc<dyn RunLogger>,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            service,
            sink,
            logger,
            cancelled,
            state: SessionState::Idle,
            segments: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to its terminal transition.
    ///
    /// On a terminal event from the service the full ordered segment
    /// sequence (blank segments included) is written to the snapshot exactly
    /// once. A cooperative cancel exits at the next checkpoint without
    /// waiting for end-of-stream and without writing the snapshot; segments
    /// already appended stay on disk.
    pub fn run(
        mut self,
        audio_path: &Path,
        credentials: &Credentials,
    ) -> Result<SessionOutcome, SessionError> {
        if credentials.subscription_key.trim().is_empty() {
            return Err(SessionError::AuthConfig("subscription key is empty"));
        }
        if credentials.region.trim().is_empty() {
            return Err(SessionError::AuthConfig("region is empty"));
        }

        self.state = SessionState::Starting;
        let (event_tx, event_rx) = crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY);
        let mut handle = self
            .service
            .start_continuous(audio_path, credentials, event_tx)?;
        self.state = SessionState::Streaming;

        let poll = Duration::from_millis(CANCEL_POLL_INTERVAL_MS);
        let ending = loop {
            // Cooperative checkpoint: once the token is set, no further
            // segment is appended.
            if self.cancelled.load(Ordering::Relaxed) {
                handle.stop();
                self.state = SessionState::Done;
                return Ok(SessionOutcome::Cancelled);
            }

            match event_rx.recv_timeout(poll) {
                Ok(SessionEvent::Recognized { text, offset_ticks }) => {
                    let segment = TranscriptSegment::new(offset_ticks, text);
                    self.logger
                        .log(&format!("transcript: '{}'", segment.formatted()));
                    if !segment.is_blank() {
                        self.sink.append(&segment)?;
                    }
                    self.segments.push(segment);
                }
                Ok(SessionEvent::SessionStopped) => break Ending::Stopped,
                Ok(SessionEvent::Canceled(reason)) => break Ending::Canceled(reason),
                Err(RecvTimeoutError::Timeout) => continue,
                // The adapter hung up without a terminal event.
                Err(RecvTimeoutError::Disconnected) => {
                    break Ending::Canceled(
                        "event channel closed before the session stopped".to_string(),
                    )
                }
            }
        };

        self.state = SessionState::Stopping;
        handle.stop();
        self.state = SessionState::Done;
        self.sink.finalize(&self.segments)?;
        drop(handle);

        match ending {
            Ending::Stopped => Ok(SessionOutcome::Completed {
                segments: self.segments.len(),
            }),
            Ending::Canceled(reason) => Err(SessionError::ServiceCanceled(reason)),
        }
    }
}
