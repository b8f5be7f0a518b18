//! Forwards records to the `tracing` subscriber.

use crate::logging::{Level, LogRecord};
use crate::sink::{LogSink, SinkError};

/// Emits each record as a `tracing` event with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        match record.level {
            Level::Info => tracing::info!(
                area = %record.area,
                category = %record.category,
                event_id = %record.event_id,
                correlation_id = %record.correlation_id,
                "{}",
                record.message
            ),
            Level::Warning => tracing::warn!(
                area = %record.area,
                category = %record.category,
                event_id = %record.event_id,
                correlation_id = %record.correlation_id,
                "{}",
                record.message
            ),
            Level::Error => tracing::error!(
                area = %record.area,
                category = %record.category,
                event_id = %record.event_id,
                correlation_id = %record.correlation_id,
                "{}",
                record.message
            ),
        }
        Ok(())
    }
}
