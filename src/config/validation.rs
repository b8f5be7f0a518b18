//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the selected sink has what it needs
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::schema::{AppConfig, SinkKind};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "sink.path").
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.logging.area.trim().is_empty() {
        errors.push(ValidationError::new("logging.area", "must not be empty"));
    }
    if config.logging.event_id.trim().is_empty() {
        errors.push(ValidationError::new("logging.event_id", "must not be empty"));
    }

    let mut seen = HashSet::new();
    for (i, source) in config.correlation.sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("correlation.sources[{}].name", i),
                "must not be empty",
            ));
        } else if !seen.insert((source.location, source.name.to_ascii_lowercase())) {
            errors.push(ValidationError::new(
                format!("correlation.sources[{}]", i),
                format!("duplicate source {}", source),
            ));
        }
    }
    if axum::http::HeaderName::from_bytes(config.correlation.response_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "correlation.response_header",
            format!("'{}' is not a valid header name", config.correlation.response_header),
        ));
    }

    if config.flatten.max_depth == 0 {
        errors.push(ValidationError::new("flatten.max_depth", "must be greater than 0"));
    }

    if config.sink.kind == SinkKind::UlsFile
        && config.sink.path.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        errors.push(ValidationError::new("sink.path", "required when sink.kind is uls_file"));
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("invalid filter '{}'", config.observability.log_level),
        ));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.max_form_bytes == 0 {
        errors.push(ValidationError::new("server.max_form_bytes", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
