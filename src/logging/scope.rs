//! Timed logging scopes.
//!
//! # States
//! ```text
//! Created → Running    inside Scope::start: "started[ - extra]" is logged, timer starts
//! Running → Finished   first release()/finish()/drop: "finished - took N ms[ - extra]"
//! Finished → Finished  further releases are no-ops returning None
//! ```
//!
//! # Design Decisions
//! - Operation, extra info and correlation id are captured at creation and
//!   reused for the finished record, even if the request context is gone
//! - `Drop` releases, so every exit path (return, `?`, unwinding) is covered

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::correlation::CorrelationId;
use crate::error::ScopeLogResult;
use crate::logging::flatten::ErrorNode;
use crate::logging::record::Level;
use crate::logging::service::LoggerService;

/// Creates scopes for a logger.
pub trait ScopeFactory: Send + Sync {
    fn create_scope(&self, logger: Arc<dyn LoggerService>, operation: &str, extra_info: &str) -> Scope;
}

/// Default factory: scopes bound to the caller's current correlation id.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedScopeFactory;

impl ScopeFactory for TimedScopeFactory {
    fn create_scope(&self, logger: Arc<dyn LoggerService>, operation: &str, extra_info: &str) -> Scope {
        let correlation_id = logger.correlation_id();
        Scope::start(logger, operation, extra_info, correlation_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeState {
    Running,
    Finished,
}

/// A timed bracket around one operation.
pub struct Scope {
    logger: Arc<dyn LoggerService>,
    operation: String,
    extra_info: String,
    correlation_id: CorrelationId,
    timer: Instant,
    state: ScopeState,
}

impl Scope {
    /// Log the started record and begin timing.
    pub fn start(logger: Arc<dyn LoggerService>, operation: &str, extra_info: &str, correlation_id: CorrelationId) -> Self {
        let mut scope = Self {
            logger,
            operation: operation.to_string(),
            extra_info: extra_info.to_string(),
            correlation_id,
            timer: Instant::now(),
            state: ScopeState::Running,
        };
        scope.emit(Level::Info, &format!("started{}", scope.extra_suffix()));
        scope.timer = Instant::now();
        scope
    }

    /// Stop timing and log the finished record.
    ///
    /// Returns the elapsed milliseconds on the first call and `None` afterwards.
    pub fn release(&mut self) -> Option<u128> {
        if self.state == ScopeState::Finished {
            return None;
        }
        self.state = ScopeState::Finished;
        let elapsed_ms = self.timer.elapsed().as_millis();
        self.emit(
            Level::Info,
            &format!("finished - took {} ms{}", elapsed_ms, self.extra_suffix()),
        );
        Some(elapsed_ms)
    }

    /// Consume the scope, releasing it.
    pub fn finish(mut self) -> Option<u128> {
        self.release()
    }

    pub fn is_finished(&self) -> bool {
        self.state == ScopeState::Finished
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn extra_info(&self) -> &str {
        &self.extra_info
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn log_info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn log_warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn log_error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn log_exception(&self, message: &str, err: Option<&dyn ErrorNode>) {
        self.logger
            .log_exception_with_correlation(message, err, &self.operation, self.correlation_id);
    }

    /// Open a nested scope on the same logger.
    ///
    /// The child resolves its correlation id from the context active now,
    /// not from this scope's captured id.
    pub fn nested(&self, operation: &str, extra_info: &str) -> ScopeLogResult<Scope> {
        self.logger.scope(operation, extra_info)
    }

    fn extra_suffix(&self) -> String {
        if self.extra_info.trim().is_empty() {
            String::new()
        } else {
            format!(" - {}", self.extra_info)
        }
    }

    fn emit(&self, level: Level, message: &str) {
        self.logger
            .log_with_correlation(level, message, &self.operation, self.correlation_id);
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("operation", &self.operation)
            .field("extra_info", &self.extra_info)
            .field("correlation_id", &self.correlation_id)
            .field("state", &self.state)
            .finish()
    }
}
