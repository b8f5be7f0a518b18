//! Correlation identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque 128-bit identifier linking all records of one logical operation.
///
/// The nil UUID doubles as the "no correlation" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// The empty sentinel.
    pub const EMPTY: CorrelationId = CorrelationId(Uuid::nil());

    /// Generate a fresh random id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a raw value, returning the empty sentinel on any failure.
    ///
    /// Accepts every textual UUID form (simple, hyphenated, braced, urn),
    /// ignoring surrounding whitespace.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::EMPTY;
        }
        Uuid::parse_str(raw).map(Self).unwrap_or(Self::EMPTY)
    }

    /// True for the nil sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}
