//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Response, Router};

use scope_logger::config::AppConfig;
use scope_logger::correlation::{ContextAccessor, FixedContext, SourceKey, StaticSource};
use scope_logger::http::{build_router, AppState, CorrelationState};
use scope_logger::logging::{LoggerService, ScopeFactory, StructuredLogger, TimedScopeFactory};
use scope_logger::registry::ServiceRegistry;
use scope_logger::sink::MemorySink;

pub const REQUEST_GUID: &str = "6f9619ff-8b86-d011-b42d-00c04fc964ff";

/// A logger writing to memory, registered in a private registry.
pub struct Harness {
    pub sink: Arc<MemorySink>,
    pub registry: Arc<ServiceRegistry>,
    pub logger: Arc<dyn LoggerService>,
}

impl Harness {
    /// Logger reading correlation from the task-local request context.
    pub fn new() -> Self {
        Self::build(|logger| logger)
    }

    /// Logger with a fixed correlation source carrying `REQUEST_GUID`.
    pub fn with_request_guid() -> Self {
        let source = StaticSource::new().with(SourceKey::request_header("SPRequestGuid"), REQUEST_GUID);
        let context: Arc<dyn ContextAccessor> = Arc::new(FixedContext::new(Arc::new(source)));
        Self::build(move |logger| logger.with_context(context))
    }

    fn build(customize: impl FnOnce(StructuredLogger) -> StructuredLogger) -> Self {
        let sink = Arc::new(MemorySink::new());
        let registry = Arc::new(ServiceRegistry::new());
        let logger: Arc<dyn LoggerService> =
            Arc::new(customize(StructuredLogger::new(sink.clone()).with_registry(&registry)));

        registry.register_instance::<dyn LoggerService>(logger.clone());
        registry.register_instance::<dyn ScopeFactory>(Arc::new(TimedScopeFactory));

        Self { sink, registry, logger }
    }

    /// Demo router wired to this harness's logger.
    pub fn router(&self) -> Router {
        let correlation = CorrelationState::from_config(&AppConfig::default()).unwrap();
        build_router(
            AppState {
                logger: self.logger.clone(),
            },
            Arc::new(correlation),
        )
    }
}

/// Parse the `N` out of a "finished - took N ms[ - extra]" message.
pub fn took_ms(message: &str) -> u128 {
    message
        .strip_prefix("finished - took ")
        .and_then(|rest| rest.split(" ms").next())
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("not a finished message: {}", message))
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
