//! Correlation id resolution.
//!
//! # Responsibilities
//! - Hold the ordered list of named sources
//! - Return the first value that parses as a correlation id
//!
//! # Design Decisions
//! - Empty and malformed values fall through to the next source
//! - An unavailable source is logged at debug level and skipped; it never
//!   changes the outcome of the scan

use crate::correlation::id::CorrelationId;
use crate::correlation::source::{CorrelationSource, SourceKey};

/// Scans correlation sources in a fixed priority order.
#[derive(Debug, Clone)]
pub struct CorrelationResolver {
    sources: Vec<SourceKey>,
}

impl CorrelationResolver {
    pub fn new(sources: Vec<SourceKey>) -> Self {
        Self { sources }
    }

    /// Priority list of a SharePoint-hosted deployment.
    pub fn default_sources() -> Vec<SourceKey> {
        vec![
            SourceKey::response_header("X-SPCorrelationId"),
            SourceKey::request_header("SPRequestGuid"),
            SourceKey::form_field("SPCorrelationId"),
            SourceKey::query_field("SPRequestGuid"),
            SourceKey::query_field("SPCorrelationId"),
        ]
    }

    pub fn sources(&self) -> &[SourceKey] {
        &self.sources
    }

    /// Resolve against `source`, returning the empty id if nothing usable is found.
    pub fn resolve(&self, source: &dyn CorrelationSource) -> CorrelationId {
        for key in &self.sources {
            match source.lookup(key) {
                Ok(Some(raw)) => {
                    let id = CorrelationId::parse_lenient(&raw);
                    if !id.is_empty() {
                        return id;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(source = %key, error = %e, "Correlation source unavailable, skipping");
                }
            }
        }
        CorrelationId::EMPTY
    }
}

impl Default for CorrelationResolver {
    fn default() -> Self {
        Self::new(Self::default_sources())
    }
}
