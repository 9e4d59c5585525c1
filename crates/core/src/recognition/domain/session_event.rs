/// Events the speech service delivers over the session's event queue.
///
/// The service adapter pushes these from its own thread; the session's run
/// loop consumes them sequentially, so session state is only ever touched
/// from one side of the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// One recognized utterance; offset in 100 ns ticks from stream start.
    Recognized { text: String, offset_ticks: u64 },
    /// Natural end of the audio stream. The sole authoritative completion
    /// signal, together with `Canceled`.
    SessionStopped,
    /// Service-initiated termination (auth rejection, network drop, ...),
    /// carrying the service's reason.
    Canceled(String),
}
