//! The default [`LoggerService`] implementation.
//!
//! # Responsibilities
//! - Resolve the correlation id from the active request context
//! - Sanitize messages and stamp area, category, event id and time
//! - Flatten errors into consecutive Error records
//! - Hand records to the configured sink, swallowing write failures

use std::sync::{Arc, Weak};

use crate::config::{AppConfig, DEFAULT_AREA, DEFAULT_EVENT_ID};
use crate::correlation::{ContextAccessor, CorrelationId, CorrelationResolver, TaskLocalContext};
use crate::error::{ScopeLogError, ScopeLogResult};
use crate::logging::flatten::{flatten_with_depth, ErrorNode, ExceptionRecord, DEFAULT_MAX_DEPTH};
use crate::logging::record::{Level, LogRecord};
use crate::logging::scope::{Scope, ScopeFactory};
use crate::logging::service::LoggerService;
use crate::registry::ServiceRegistry;
use crate::sink::LogSink;

/// Prefix used when an exception is logged without a message.
pub const DEFAULT_EXCEPTION_MESSAGE: &str = "Exception occurred.";

/// Render one flattened error as a log message.
pub fn format_exception(message: &str, record: &ExceptionRecord) -> String {
    format!(
        "{} Exception name:'{}', Exception message:'{}' , Stack:'{}'",
        message, record.kind, record.message, record.detail
    )
}

/// Structured logger writing to a [`LogSink`].
pub struct StructuredLogger {
    area: String,
    event_id: String,
    resolver: CorrelationResolver,
    context: Arc<dyn ContextAccessor>,
    sink: Arc<dyn LogSink>,
    registry: Weak<ServiceRegistry>,
    max_flatten_depth: usize,
}

impl StructuredLogger {
    /// Logger with default area/event id, task-local request context and
    /// the global registry.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            area: DEFAULT_AREA.to_string(),
            event_id: DEFAULT_EVENT_ID.to_string(),
            resolver: CorrelationResolver::default(),
            context: Arc::new(TaskLocalContext),
            sink,
            registry: Arc::downgrade(&ServiceRegistry::global()),
            max_flatten_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Logger configured from the `[logging]`, `[correlation]` and `[flatten]` sections.
    pub fn from_config(config: &AppConfig, sink: Arc<dyn LogSink>) -> Self {
        Self::new(sink)
            .with_area(&config.logging.area)
            .with_event_id(&config.logging.event_id)
            .with_resolver(CorrelationResolver::new(config.correlation.sources.clone()))
            .with_max_flatten_depth(config.flatten.max_depth)
    }

    pub fn with_area(mut self, area: &str) -> Self {
        self.area = area.to_string();
        self
    }

    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_id = event_id.to_string();
        self
    }

    pub fn with_resolver(mut self, resolver: CorrelationResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_context(mut self, context: Arc<dyn ContextAccessor>) -> Self {
        self.context = context;
        self
    }

    /// Registry consulted by [`LoggerService::scope`].
    ///
    /// Held weakly; `scope` fails once the registry is dropped.
    pub fn with_registry(mut self, registry: &Arc<ServiceRegistry>) -> Self {
        self.registry = Arc::downgrade(registry);
        self
    }

    pub fn with_max_flatten_depth(mut self, depth: usize) -> Self {
        self.max_flatten_depth = depth;
        self
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

impl LoggerService for StructuredLogger {
    fn correlation_id(&self) -> CorrelationId {
        self.context
            .current()
            .map(|source| self.resolver.resolve(source.as_ref()))
            .unwrap_or(CorrelationId::EMPTY)
    }

    fn log_with_correlation(&self, level: Level, message: &str, operation: &str, correlation_id: CorrelationId) {
        let record = LogRecord::new(level, &self.area, operation, &self.event_id, correlation_id, message);
        if let Err(e) = self.sink.write(&record) {
            tracing::warn!(
                error = %e,
                category = %operation,
                correlation_id = %correlation_id,
                "Log sink write failed, record dropped"
            );
        }
    }

    fn log_exception_with_correlation(
        &self,
        message: &str,
        err: Option<&dyn ErrorNode>,
        operation: &str,
        correlation_id: CorrelationId,
    ) {
        let message = if message.is_empty() {
            DEFAULT_EXCEPTION_MESSAGE
        } else {
            message
        };

        let mut records = flatten_with_depth(err, self.max_flatten_depth);
        let first = records.next().unwrap_or_else(ExceptionRecord::not_available);
        for record in std::iter::once(first).chain(records) {
            self.log_with_correlation(Level::Error, &format_exception(message, &record), operation, correlation_id);
        }
    }

    fn scope(&self, operation: &str, extra_info: &str) -> ScopeLogResult<Scope> {
        let registry = self
            .registry
            .upgrade()
            .ok_or(ScopeLogError::MissingCollaborator("ServiceRegistry"))?;
        let factory = registry
            .resolve::<dyn ScopeFactory>()
            .ok_or(ScopeLogError::MissingCollaborator("ScopeFactory"))?;
        let logger = registry
            .resolve::<dyn LoggerService>()
            .ok_or(ScopeLogError::MissingCollaborator("LoggerService"))?;

        Ok(factory.create_scope(logger, operation, extra_info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::{FixedContext, SourceKey, StaticSource};
    use crate::logging::fault::Fault;
    use crate::logging::scope::TimedScopeFactory;
    use crate::sink::{MemorySink, SinkError};

    const ID: &str = "6f9619ff-8b86-d011-b42d-00c04fc964ff";

    fn request_context() -> Arc<dyn ContextAccessor> {
        let source = StaticSource::new().with(SourceKey::request_header("SPRequestGuid"), ID);
        Arc::new(FixedContext::new(Arc::new(source)))
    }

    fn logger(sink: Arc<MemorySink>) -> StructuredLogger {
        StructuredLogger::new(sink).with_context(request_context())
    }

    #[test]
    fn test_levels_and_fields() {
        let sink = Arc::new(MemorySink::new());
        let logger = logger(sink.clone());

        logger.log_info("hello", "Get");
        logger.log_warning("careful", "Get");
        logger.log_error("bad", "Post");

        let records = sink.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[1].level, Level::Warning);
        assert_eq!(records[2].level, Level::Error);
        assert_eq!(records[2].category, "Post");
        assert!(records.iter().all(|r| r.area == DEFAULT_AREA && r.event_id == DEFAULT_EVENT_ID));
        assert!(records.iter().all(|r| r.correlation_id == CorrelationId::parse_lenient(ID)));
    }

    #[test]
    fn test_messages_are_sanitized() {
        let sink = Arc::new(MemorySink::new());
        logger(sink.clone()).log_info("a\r\nb\tc", "Get");
        assert_eq!(sink.messages(), vec!["abc"]);
    }

    #[test]
    fn test_no_context_means_empty_correlation() {
        let sink = Arc::new(MemorySink::new());
        let logger = StructuredLogger::new(sink.clone()).with_context(Arc::new(FixedContext::empty()));
        assert!(logger.correlation_id().is_empty());

        logger.log_info("x", "Get");
        assert!(sink.records()[0].correlation_id.is_empty());
    }

    #[test]
    fn test_exception_chain() {
        let sink = Arc::new(MemorySink::new());
        let err = Fault::new("Outer", "e1")
            .with_detail("trace-1")
            .caused_by(Fault::new("Inner", "e2"));

        logger(sink.clone()).log_exception_with_message("Saving failed.", Some(&err), "Save");

        let messages = sink.messages();
        assert_eq!(
            messages,
            vec![
                "Saving failed. Exception name:'Outer', Exception message:'e1' , Stack:'trace-1'",
                "Saving failed. Exception name:'Inner', Exception message:'e2' , Stack:'N/A'",
            ]
        );
        assert!(sink.records().iter().all(|r| r.level == Level::Error));
    }

    #[test]
    fn test_exception_default_message() {
        let sink = Arc::new(MemorySink::new());
        logger(sink.clone()).log_exception(Some(&Fault::new("Io", "disk full")), "Write");
        assert!(sink.messages()[0].starts_with("Exception occurred. Exception name:'Io'"));
    }

    #[test]
    fn test_exception_none() {
        let sink = Arc::new(MemorySink::new());
        logger(sink.clone()).log_exception(None, "Write");
        assert_eq!(
            sink.messages(),
            vec!["Exception occurred. Exception name:'N/A', Exception message:'N/A' , Stack:'N/A'"]
        );
    }

    #[test]
    fn test_exception_composite() {
        let sink = Arc::new(MemorySink::new());
        let err = Fault::composite(
            "Aggregate",
            "fan-out",
            vec![Fault::new("A", "e1"), Fault::new("B", "e2"), Fault::new("C", "e3")],
        );
        logger(sink.clone()).log_exception(Some(&err), "FanOut");

        let messages = sink.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("Exception message:'e1'"));
        assert!(messages[2].contains("Exception message:'e3'"));
    }

    #[test]
    fn test_exception_message_with_newlines_is_sanitized() {
        let sink = Arc::new(MemorySink::new());
        let err = Fault::new("Io", "line1\nline2").with_detail("at a\n\tat b");
        logger(sink.clone()).log_exception(Some(&err), "Write");
        let message = &sink.messages()[0];
        assert!(message.contains("line1line2"));
        assert!(message.contains("at aat b"));
    }

    struct FailingSink;

    impl LogSink for FailingSink {
        fn write(&self, _record: &LogRecord) -> Result<(), SinkError> {
            Err(SinkError::Poisoned)
        }
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        let logger = StructuredLogger::new(Arc::new(FailingSink)).with_context(request_context());
        logger.log_error("nobody hears this", "Get");
        logger.log_exception(Some(&Fault::new("X", "y")), "Get");
    }

    #[test]
    fn test_scope_requires_factory() {
        let registry = Arc::new(ServiceRegistry::new());
        let logger = logger(Arc::new(MemorySink::new())).with_registry(&registry);
        let err = logger.scope("Get", "test").unwrap_err();
        assert!(matches!(err, ScopeLogError::MissingCollaborator("ScopeFactory")));
    }

    #[test]
    fn test_scope_requires_logger() {
        let registry = Arc::new(ServiceRegistry::new());
        registry.register_instance::<dyn ScopeFactory>(Arc::new(TimedScopeFactory));
        let logger = StructuredLogger::new(Arc::new(MemorySink::new())).with_registry(&registry);

        let err = logger.scope("Get", "test").unwrap_err();
        assert!(matches!(err, ScopeLogError::MissingCollaborator("LoggerService")));
    }

    #[test]
    fn test_scope_through_registry() {
        let sink = Arc::new(MemorySink::new());
        let registry = Arc::new(ServiceRegistry::new());
        let logger: Arc<dyn LoggerService> = Arc::new(
            StructuredLogger::new(sink.clone())
                .with_context(request_context())
                .with_registry(&registry),
        );
        registry.register_instance::<dyn LoggerService>(logger.clone());
        registry.register_instance::<dyn ScopeFactory>(Arc::new(TimedScopeFactory));

        let scope = logger.scope("Get", "test").unwrap();
        assert_eq!(scope.correlation_id(), CorrelationId::parse_lenient(ID));
        drop(scope);

        let messages = sink.messages();
        assert_eq!(messages[0], "started - test");
        assert!(messages[1].starts_with("finished - took"));
    }

    #[test]
    fn test_registered_logger_does_not_keep_registry_alive() {
        let registry = Arc::new(ServiceRegistry::new());
        let logger: Arc<dyn LoggerService> =
            Arc::new(StructuredLogger::new(Arc::new(MemorySink::new())).with_registry(&registry));
        registry.register_instance::<dyn LoggerService>(logger.clone());
        registry.register_instance::<dyn ScopeFactory>(Arc::new(TimedScopeFactory));

        let released = Arc::downgrade(&registry);
        drop(registry);
        assert!(released.upgrade().is_none());

        let err = logger.scope("Get", "test").unwrap_err();
        assert!(matches!(err, ScopeLogError::MissingCollaborator("ServiceRegistry")));
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.logging.area = "Billing".into();
        config.logging.event_id = "42".into();

        let sink = Arc::new(MemorySink::new());
        let logger = StructuredLogger::from_config(&config, sink.clone()).with_context(Arc::new(FixedContext::empty()));
        logger.log_info("x", "Op");

        assert_eq!(logger.area(), "Billing");
        assert_eq!(sink.records()[0].event_id, "42");
    }
}
