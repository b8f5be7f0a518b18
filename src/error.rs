//! Crate-level error definitions.
//!
//! Only wiring defects surface to callers. Everything else that can go wrong
//! while logging (bad correlation input, sink failures, broken cause chains)
//! is recovered where it happens.

use thiserror::Error;

/// Errors returned by the logging facade.
#[derive(Debug, Error)]
pub enum ScopeLogError {
    /// A collaborator required at this call site was never registered.
    #[error("missing required collaborator: {0} is not registered")]
    MissingCollaborator(&'static str),
}

/// Result type for logging facade operations.
pub type ScopeLogResult<T> = Result<T, ScopeLogError>;
