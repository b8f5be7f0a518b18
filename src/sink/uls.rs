//! Tab-separated ULS-style file sink.
//!
//! # Format
//! ```text
//! Timestamp\tArea\tCategory\tEventID\tLevel\tMessage\tCorrelation
//! 2024-05-01T10:00:00.123Z\tEUSignNet\tGet\t00000\tVerbose\tstarted - test\t<uuid>
//! ```
//!
//! # Design Decisions
//! - The header row is written only when the file is empty, so restarts and
//!   several processes appending to one file produce a single header
//! - Every field is stripped of tabs and line breaks before writing

use chrono::SecondsFormat;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::logging::{sanitize_message, LogRecord};
use crate::sink::{LogSink, SinkError};

/// Column header row.
pub const HEADER: &str = "Timestamp\tArea\tCategory\tEventID\tLevel\tMessage\tCorrelation";

/// Appends records to a file, one tab-separated line each.
pub struct UlsFileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl UlsFileSink {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", HEADER)?;
        }

        tracing::debug!(path = %path.display(), "ULS file sink opened");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render one record as a line (without the trailing newline).
pub fn format_line(record: &LogRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        sanitize_message(&record.area),
        sanitize_message(&record.category),
        sanitize_message(&record.event_id),
        record.level.uls_name(),
        sanitize_message(&record.message),
        record.correlation_id,
    )
}

impl LogSink for UlsFileSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = format_line(record);
        let mut file = self.file.lock().map_err(|_| SinkError::Poisoned)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
