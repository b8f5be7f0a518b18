//! Observability subsystem.
//!
//! The crate's own diagnostics (startup, sink failures, swallowed correlation
//! lookups, HTTP traces) go through `tracing`. This is separate from the
//! structured records produced by [`crate::logging`], although the default
//! [`crate::sink::TracingSink`] routes those records through the same
//! subscriber.
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_tracing;
