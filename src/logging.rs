//! Logger setup: every record goes to stdout and is appended to the log file
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};

use env_logger::{Target, WriteStyle};
use log::{Level, LevelFilter};

use crate::errors::{MigrateError, MigrateErrorKind};

/// Log file of a run, relative to the working directory
pub const LOG_FILE: &str = "migration.log";

/// Writer duplicating everything to stdout and to an append-only file
#[derive(Debug, Clone)]
pub(crate) struct TeeWriter {
    /// File appended to
    log_file: PathBuf,
}

impl TeeWriter {
    /// Create a writer appending to `log_file`
    pub(crate) fn new(log_file: &Path) -> Self {
        Self {
            log_file: log_file.to_path_buf(),
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Label of a level in the log lines
pub(crate) fn level_label(level: Level) -> &'static str {
    match level {
        Level::Warn => "WARNING",
        other => other.as_str(),
    }
}

/// Level of the crate's own records for a `-v` count
fn verbosity_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger
/// # Errors
/// Error if a logger is already installed
pub fn init(verbose: u8, log_file: &Path) -> Result<(), MigrateError> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .filter_module(env!("CARGO_CRATE_NAME"), verbosity_filter(verbose))
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter::new(log_file))))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                buf.timestamp_seconds(),
                level_label(record.level()),
                record.args()
            )
        })
        .try_init()
        .map_err(|e| MigrateError::with_source(MigrateErrorKind::Logger, e))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn warn_is_spelled_out() {
        assert_eq!(level_label(Level::Warn), "WARNING");
        assert_eq!(level_label(Level::Info), "INFO");
        assert_eq!(level_label(Level::Error), "ERROR");
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(verbosity_filter(0), LevelFilter::Info);
        assert_eq!(verbosity_filter(1), LevelFilter::Debug);
        assert_eq!(verbosity_filter(5), LevelFilter::Trace);
    }

    #[test]
    fn tee_appends_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_file = dir.path().join(LOG_FILE);
        std::fs::write(&log_file, "[earlier] [INFO] previous run\n").unwrap();

        let mut writer = TeeWriter::new(&log_file);
        writer.write_all(b"[now] [INFO] first\n").unwrap();
        writer.write_all(b"[now] [ERROR] second\n").unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert_eq!(
            content,
            "[earlier] [INFO] previous run\n[now] [INFO] first\n[now] [ERROR] second\n"
        );
    }
}
