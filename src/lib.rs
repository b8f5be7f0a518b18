//! Request-scoped structured logging.
//!
//! Every inbound operation gets a correlation id, every record carries it,
//! and named scopes measure how long operations take.
//!
//! # Architecture Overview
//!
//! ```text
//!   request ──▶ http::middleware ──▶ RequestContext (task-local source)
//!                                          │
//!   handler ──▶ LoggerService ──▶ CorrelationResolver
//!                 │      │
//!                 │      └──▶ Scope (started / finished - took N ms)
//!                 ▼
//!             LogRecord ──▶ LogSink (tracing | JSON lines | ULS file | memory)
//!
//!   ServiceRegistry: dyn LoggerService, dyn ScopeFactory (wired at startup)
//! ```

pub mod error;

// Core
pub mod correlation;
pub mod logging;
pub mod registry;
pub mod sink;

// Adapters and ambient concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use correlation::{CorrelationId, CorrelationResolver};
pub use error::{ScopeLogError, ScopeLogResult};
pub use http::HttpServer;
pub use logging::{Fault, LoggerService, LoggerServiceExt, Scope, ScopeFactory, StructuredLogger};
pub use registry::ServiceRegistry;
