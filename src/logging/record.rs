//! The structured record handed to sinks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::correlation::CorrelationId;

/// Severity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    /// Level name in the tab-separated ULS file format.
    pub fn uls_name(&self) -> &'static str {
        match self {
            Level::Info => "Verbose",
            Level::Warning => "Medium",
            Level::Error => "High",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Info => "Info",
            Level::Warning => "Warning",
            Level::Error => "Error",
        };
        f.write_str(s)
    }
}

/// One structured log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub area: String,
    /// Operation (member) name supplied by the caller.
    pub category: String,
    pub event_id: String,
    pub correlation_id: CorrelationId,
    /// Never contains `\r`, `\n` or `\t`.
    pub message: String,
}

impl LogRecord {
    /// Build a record stamped with the current UTC time; `message` is sanitized.
    pub fn new(
        level: Level,
        area: &str,
        category: &str,
        event_id: &str,
        correlation_id: CorrelationId,
        message: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            area: area.to_string(),
            category: category.to_string(),
            event_id: event_id.to_string(),
            correlation_id,
            message: sanitize_message(message),
        }
    }
}

/// Strip carriage returns, line feeds and tabs so line-oriented readers
/// never see a record break inside a message.
pub fn sanitize_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect()
}
