//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → lifecycle::startup builds sink, logger and scope factory from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, CorrelationConfig, FlattenConfig, LogFormat, LoggingConfig, ObservabilityConfig,
    ServerConfig, SinkConfig, SinkKind, DEFAULT_AREA, DEFAULT_EVENT_ID,
};
pub use validation::{validate_config, ValidationError};
