//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap (lifecycle::startup)
//!     → register_instance / register_factory
//!     → new immutable snapshot swapped in atomically
//!
//! call sites (LoggerService::scope, handlers)
//!     → resolve::<dyn Capability>()
//!     → lock-free read of the current snapshot
//! ```
//!
//! # Design Decisions
//! - Keyed by `TypeId`, so trait objects (`dyn LoggerService`) are valid keys
//! - Absence is `None`, never an error; callers decide whether it is fatal
//! - Registration is expected at startup or in test setup only

pub mod container;

pub use container::ServiceRegistry;
