use crate::shared::constants::TICKS_PER_SECOND;

/// One recognized utterance with its offset from the start of the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptSegment {
    /// Start of the utterance in 100 ns ticks, as reported by the service.
    pub offset_ticks: u64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(offset_ticks: u64, text: impl Into<String>) -> Self {
        Self {
            offset_ticks,
            text: text.into(),
        }
    }

    /// Offset in whole seconds (floor), the display resolution.
    pub fn offset_seconds(&self) -> u64 {
        self.offset_ticks / TICKS_PER_SECOND
    }

    /// Blank segments are suppressed from the transcript file but still
    /// counted in the ordered sequence.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// `[HH:MM:SS] <text>`, zero-padded, hour wrapping at 24 clock-style.
    pub fn formatted(&self) -> String {
        let secs = self.offset_seconds();
        format!(
            "[{:02}:{:02}:{:02}] {}",
            (secs / 3600) % 24,
            (secs % 3600) / 60,
            secs % 60,
            self.text
        )
    }
}
