//! Correlation subsystem.
//!
//! # Data Flow
//! ```text
//! transport layer (http::RequestContext, or any CorrelationSource)
//!     → context.rs (task-local "current request" accessor)
//!     → resolver.rs (scan named sources in priority order)
//!     → id.rs (parse into CorrelationId, nil when absent/malformed)
//!     → stamped on every LogRecord
//! ```
//!
//! # Design Decisions
//! - Resolution never fails: malformed values and unavailable sources are
//!   treated as absent and the scan moves on
//! - The resolver holds no per-request state; it is resolved again on every
//!   log call, so one logger serves all concurrent requests
//! - The current request travels in a tokio task-local rather than a global

pub mod context;
pub mod id;
pub mod resolver;
pub mod source;

pub use context::{ContextAccessor, FixedContext, TaskLocalContext};
pub use id::CorrelationId;
pub use resolver::CorrelationResolver;
pub use source::{CorrelationSource, SourceKey, SourceLocation, SourceUnavailable, StaticSource};
