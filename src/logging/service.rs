//! The logging facade consumed by application code.

use std::error::Error;
use std::future::Future;

use crate::correlation::CorrelationId;
use crate::error::ScopeLogResult;
use crate::logging::fault::Fault;
use crate::logging::flatten::ErrorNode;
use crate::logging::record::Level;
use crate::logging::scope::Scope;

/// Structured, correlated logging for one process.
///
/// `operation` is the caller's member name and ends up as the record category.
pub trait LoggerService: Send + Sync {
    /// Correlation id of the operation currently executing, resolved on every call.
    fn correlation_id(&self) -> CorrelationId;

    /// Emit one record with an explicit correlation id.
    fn log_with_correlation(&self, level: Level, message: &str, operation: &str, correlation_id: CorrelationId);

    /// Log `err` flattened into one Error record per [`ExceptionRecord`](crate::logging::ExceptionRecord),
    /// each prefixed with `message` and tagged with `correlation_id`.
    fn log_exception_with_correlation(
        &self,
        message: &str,
        err: Option<&dyn ErrorNode>,
        operation: &str,
        correlation_id: CorrelationId,
    );

    /// Open a timed [`Scope`] around `operation`.
    fn scope(&self, operation: &str, extra_info: &str) -> ScopeLogResult<Scope>;

    fn log_info(&self, message: &str, operation: &str) {
        self.log_with_correlation(Level::Info, message, operation, self.correlation_id());
    }

    fn log_warning(&self, message: &str, operation: &str) {
        self.log_with_correlation(Level::Warning, message, operation, self.correlation_id());
    }

    fn log_error(&self, message: &str, operation: &str) {
        self.log_with_correlation(Level::Error, message, operation, self.correlation_id());
    }

    /// Like [`LoggerService::log_exception_with_correlation`], resolving the id once for all records.
    fn log_exception_with_message(&self, message: &str, err: Option<&dyn ErrorNode>, operation: &str) {
        self.log_exception_with_correlation(message, err, operation, self.correlation_id());
    }

    fn log_exception(&self, err: Option<&dyn ErrorNode>, operation: &str) {
        self.log_exception_with_message("", err, operation);
    }
}

/// Convenience helpers available on every [`LoggerService`].
pub trait LoggerServiceExt: LoggerService {
    /// Run `f` inside a scope; the finished record is emitted however `f` exits.
    fn with_scope<R>(&self, operation: &str, extra_info: &str, f: impl FnOnce(&Scope) -> R) -> ScopeLogResult<R> {
        let scope = self.scope(operation, extra_info)?;
        Ok(f(&scope))
    }

    /// Log any standard error together with its `source()` chain.
    fn log_std_error<E>(&self, message: &str, err: &E, operation: &str)
    where
        E: Error + 'static,
    {
        let fault = Fault::from_error(err);
        self.log_exception_with_message(message, Some(&fault), operation);
    }
}

impl<T: LoggerService + ?Sized> LoggerServiceExt for T {}

/// Await `fut` inside a scope opened on `logger`.
pub async fn in_scope<L, F>(logger: &L, operation: &str, extra_info: &str, fut: F) -> ScopeLogResult<F::Output>
where
    L: LoggerService + ?Sized,
    F: Future,
{
    let scope = logger.scope(operation, extra_info)?;
    let output = fut.await;
    scope.finish();
    Ok(output)
}
