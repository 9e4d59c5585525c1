/// Sample rate the recognition service expects for streamed speech PCM.
pub const RECOGNIZER_SAMPLE_RATE: u32 = 16_000;

/// The service reports segment offsets in ticks of 100 ns.
pub const TICKS_PER_SECOND: u64 = 10_000_000;
pub const TICKS_PER_MILLISECOND: u64 = 10_000;

/// Bounded capacity of the session event queue.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// How often the session wait loop re-checks the cancellation token while
/// the event stream is quiet.
pub const CANCEL_POLL_INTERVAL_MS: u64 = 200;

pub const DEFAULT_LOCALE: &str = "en-US";

pub const WAVEFORM_EXTENSION: &str = "wav";
pub const TRANSCRIPT_EXTENSION: &str = "txt";

/// Extension of the per-video structured snapshot artifact.
pub const SNAPSHOT_EXTENSION: &str = "transcript.json";
