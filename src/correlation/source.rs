//! Named correlation sources supplied by the transport layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Where a candidate correlation value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    ResponseHeader,
    RequestHeader,
    FormField,
    QueryField,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceLocation::ResponseHeader => "response header",
            SourceLocation::RequestHeader => "request header",
            SourceLocation::FormField => "request form field",
            SourceLocation::QueryField => "request query field",
        };
        f.write_str(s)
    }
}

/// A named lookup, e.g. request header `SPRequestGuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    pub location: SourceLocation,
    pub name: String,
}

impl SourceKey {
    pub fn new(location: SourceLocation, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
        }
    }

    pub fn response_header(name: impl Into<String>) -> Self {
        Self::new(SourceLocation::ResponseHeader, name)
    }

    pub fn request_header(name: impl Into<String>) -> Self {
        Self::new(SourceLocation::RequestHeader, name)
    }

    pub fn form_field(name: impl Into<String>) -> Self {
        Self::new(SourceLocation::FormField, name)
    }

    pub fn query_field(name: impl Into<String>) -> Self {
        Self::new(SourceLocation::QueryField, name)
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.location, self.name)
    }
}

/// A source could not be read at all (as opposed to being empty).
#[derive(Debug, Clone, Error)]
#[error("{location} unavailable: {reason}")]
pub struct SourceUnavailable {
    pub location: SourceLocation,
    pub reason: String,
}

impl SourceUnavailable {
    pub fn new(location: SourceLocation, reason: impl Into<String>) -> Self {
        Self {
            location,
            reason: reason.into(),
        }
    }
}

/// Key/value lookup capability over the current request.
pub trait CorrelationSource: Send + Sync {
    /// Return the raw value for `key`, `Ok(None)` when absent.
    fn lookup(&self, key: &SourceKey) -> Result<Option<String>, SourceUnavailable>;
}

/// In-memory source for tests and non-HTTP callers.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    values: HashMap<SourceKey, String>,
    unavailable: Vec<SourceLocation>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: SourceKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Make every lookup at `location` fail.
    pub fn with_unavailable(mut self, location: SourceLocation) -> Self {
        self.unavailable.push(location);
        self
    }
}

impl CorrelationSource for StaticSource {
    fn lookup(&self, key: &SourceKey) -> Result<Option<String>, SourceUnavailable> {
        if self.unavailable.contains(&key.location) {
            return Err(SourceUnavailable::new(key.location, "marked unavailable"));
        }
        Ok(self.values.get(key).cloned())
    }
}
