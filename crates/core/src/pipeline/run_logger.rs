/// Cross-cutting sink for run progress lines.
///
/// Decouples the pipeline from the surface that displays status (stdout, a
/// GUI log panel, tests) so the orchestration code never formats for a
/// particular front end.
pub trait RunLogger: Send + Sync {
    /// Record a human-readable status line.
    fn log(&self, message: &str);
}

/// Discards all status lines. Used by tests where output is irrelevant.
pub struct NullRunLogger;

impl RunLogger for NullRunLogger {
    fn log(&self, _message: &str) {}
}

/// Forwards status lines to the `log` facade.
pub struct LogRunLogger;

impl RunLogger for LogRunLogger {
    fn log(&self, message: &str) {
        log::info!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_is_noop() {
        NullRunLogger.log("hello");
        // No panics = success
    }

    #[test]
    fn test_log_logger_forwards() {
        // Output goes through the log facade; just exercise the path.
        LogRunLogger.log("hello");
    }
}
