//! HTTP adapter and demo service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer)
//!     → middleware/correlation.rs (capture headers/query/form, assign id)
//!         → context.rs (RequestContext as task-local CorrelationSource)
//!     → handlers log through LoggerService
//!     → response carries X-SPCorrelationId
//! ```

pub mod context;
pub mod middleware;
pub mod server;

pub use context::RequestContext;
pub use middleware::{correlation_middleware, CorrelationState};
pub use server::{build_router, AppState, HttpServer};
