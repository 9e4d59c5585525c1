use std::path::Path;

use crossbeam_channel::Sender;

use crate::recognition::domain::session_error::SessionError;
use crate::recognition::domain::session_event::SessionEvent;
use crate::shared::credentials::Credentials;

/// Domain interface to the continuous speech-recognition service.
pub trait SpeechService: Send {
    /// Begin continuous recognition of the audio file.
    ///
    /// Returns once the service has accepted the stream; events then arrive
    /// on `events` from a service-managed thread until a `SessionStopped`
    /// or `Canceled` terminal event.
    fn start_continuous(
        &self,
        audio_path: &Path,
        credentials: &Credentials,
        events: Sender<SessionEvent>,
    ) -> Result<Box<dyn RecognizerHandle>, SessionError>;
}

/// Handle over a started recognizer.
///
/// `stop` is advisory: delivery halts at the next event boundary, it does
/// not interrupt an in-flight service call. Dropping the handle releases
/// the recognizer resource.
pub trait RecognizerHandle: Send {
    fn stop(&mut self);
}
