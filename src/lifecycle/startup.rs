//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the configured sink
//! - Construct the logger and scope factory
//! - Register both in the service registry

use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::logging::{LoggerService, ScopeFactory, StructuredLogger, TimedScopeFactory};
use crate::registry::ServiceRegistry;
use crate::sink::{build_sink, SinkError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build log sink: {0}")]
    Sink(#[from] SinkError),
}

/// Register `dyn LoggerService` and `dyn ScopeFactory` in `registry`.
///
/// Returns the registered logger. Calling this again replaces both entries.
pub fn install(config: &AppConfig, registry: &Arc<ServiceRegistry>) -> Result<Arc<dyn LoggerService>, StartupError> {
    let sink = build_sink(&config.sink)?;

    let logger: Arc<dyn LoggerService> =
        Arc::new(StructuredLogger::from_config(config, sink).with_registry(registry));

    registry.register_instance::<dyn ScopeFactory>(Arc::new(TimedScopeFactory));
    registry.register_instance::<dyn LoggerService>(Arc::clone(&logger));

    tracing::info!(
        area = %config.logging.area,
        event_id = %config.logging.event_id,
        sink = ?config.sink.kind,
        sources = config.correlation.sources.len(),
        "Logging services registered"
    );

    Ok(logger)
}
