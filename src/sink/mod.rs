//! Log sink adapters.
//!
//! # Responsibilities
//! - Define the "write one structured record" capability
//! - Provide the sinks the service can be configured with
//!
//! # Sinks
//! - `TracingSink`: forwards records as `tracing` events (default)
//! - `JsonLinesSink`: one JSON object per line to any writer
//! - `UlsFileSink`: tab-separated file with a header written once
//! - `MemorySink`: keeps records for tests and diagnostics
//!
//! # Design Decisions
//! - Sinks are synchronous and may block on I/O; the logger never buffers
//! - Write failures are returned, and the logger swallows them

pub mod json;
pub mod memory;
pub mod tracing_sink;
pub mod uls;

use std::sync::Arc;
use thiserror::Error;

use crate::config::{SinkConfig, SinkKind};
use crate::logging::LogRecord;

pub use json::JsonLinesSink;
pub use memory::MemorySink;
pub use tracing_sink::TracingSink;
pub use uls::UlsFileSink;

/// Errors a sink may report.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink writer lock poisoned")]
    Poisoned,

    #[error("sink misconfigured: {0}")]
    Config(String),
}

/// Destination for structured records.
pub trait LogSink: Send + Sync {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Build the sink described by `config`.
pub fn build_sink(config: &SinkConfig) -> Result<Arc<dyn LogSink>, SinkError> {
    let sink: Arc<dyn LogSink> = match config.kind {
        SinkKind::Tracing => Arc::new(TracingSink),
        SinkKind::Json => Arc::new(JsonLinesSink::stdout()),
        SinkKind::UlsFile => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| SinkError::Config("uls_file sink requires a path".into()))?;
            Arc::new(UlsFileSink::open(path)?)
        }
    };
    Ok(sink)
}
