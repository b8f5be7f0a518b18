//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build sink → Register logger and scope factory
//! ```
//!
//! # Design Decisions
//! - Registration happens once, before any request is served
//! - Fail fast: any startup error is fatal

pub mod startup;

pub use startup::{install, StartupError};
