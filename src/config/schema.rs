//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::correlation::{CorrelationResolver, SourceKey};
use crate::logging::flatten::DEFAULT_MAX_DEPTH;

/// Area stamped on records when none is configured.
pub const DEFAULT_AREA: &str = "EUSignNet";

/// Event id stamped on records when none is configured.
pub const DEFAULT_EVENT_ID: &str = "00000";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Record tagging.
    pub logging: LoggingConfig,

    /// Correlation id lookup order and echo header.
    pub correlation: CorrelationConfig,

    /// Error flattening limits.
    pub flatten: FlattenConfig,

    /// Destination for log records.
    pub sink: SinkConfig,

    /// The crate's own diagnostics.
    pub observability: ObservabilityConfig,

    /// Demo HTTP service.
    pub server: ServerConfig,
}

/// Fields stamped on every record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Product area (e.g., "EUSignNet").
    pub area: String,

    /// Event id (e.g., "00000").
    pub event_id: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            area: DEFAULT_AREA.to_string(),
            event_id: DEFAULT_EVENT_ID.to_string(),
        }
    }
}

/// Correlation id resolution.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Sources in priority order, first valid id wins.
    pub sources: Vec<SourceKey>,

    /// Response header carrying the resolved id back to the client.
    pub response_header: String,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            sources: CorrelationResolver::default_sources(),
            response_header: "X-SPCorrelationId".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Maximum nesting followed before emitting the fallback record.
    pub max_depth: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Sink selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,

    /// File path, required for `uls_file`.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// `tracing` events.
    #[default]
    Tracing,
    /// JSON lines on stdout.
    Json,
    /// Tab-separated ULS file.
    UlsFile,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter (trace, debug, info, warn, error or a directive list).
    pub log_level: String,

    /// Output format of the diagnostics subscriber.
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Demo service listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest url-encoded form body buffered for correlation lookup.
    pub max_form_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_form_bytes: 64 * 1024,
        }
    }
}
