//! Reporting interface handed to every migration stage
use log::Level;

/// Sink for the progress messages of a migration run
pub trait Reporter: Sync + Send {
    /// Report one message at the given level
    fn report(&self, level: Level, message: &str);

    /// Report an informational message
    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    /// Report a warning
    fn warn(&self, message: &str) {
        self.report(Level::Warn, message);
    }

    /// Report an error
    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }
}

/// Reporter forwarding to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, level: Level, message: &str) {
        log::log!(level, "{message}");
    }
}
