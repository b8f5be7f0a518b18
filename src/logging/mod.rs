//! Logging subsystem.
//!
//! # Data Flow
//! ```text
//! application code
//!     → service.rs (LoggerService facade: info/warning/error/exception/scope)
//!     → logger.rs (StructuredLogger: resolve correlation, sanitize, stamp)
//!         → flatten.rs (errors → ordered ExceptionRecords)
//!         → scope.rs (timed started/finished brackets)
//!     → record.rs (LogRecord)
//!     → sink (tracing, JSON lines, ULS file, memory)
//! ```
//!
//! # Design Decisions
//! - Logging never fails the caller; only a missing scope factory or logger
//!   registration surfaces, as a startup wiring defect
//! - Operation names are explicit arguments, not captured call-site metadata

pub mod fault;
pub mod flatten;
pub mod logger;
pub mod record;
pub mod scope;
pub mod service;

pub use fault::Fault;
pub use flatten::{flatten, flatten_with_depth, CauseError, ErrorNode, ExceptionRecord, Flatten};
pub use logger::{format_exception, StructuredLogger};
pub use record::{sanitize_message, Level, LogRecord};
pub use scope::{Scope, ScopeFactory, TimedScopeFactory};
pub use service::{in_scope, LoggerService, LoggerServiceExt};
