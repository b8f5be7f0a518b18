//! Access to the correlation source of the operation currently executing.

use std::future::Future;
use std::sync::Arc;

use crate::correlation::source::CorrelationSource;

tokio::task_local! {
    static CURRENT_SOURCE: Arc<dyn CorrelationSource>;
}

/// Yields the correlation source of the active operation, if any.
pub trait ContextAccessor: Send + Sync {
    fn current(&self) -> Option<Arc<dyn CorrelationSource>>;
}

/// Reads the source installed by [`TaskLocalContext::scope`] for the running task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLocalContext;

impl TaskLocalContext {
    /// Run `fut` with `source` as the current correlation source.
    pub async fn scope<F>(source: Arc<dyn CorrelationSource>, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_SOURCE.scope(source, fut).await
    }

    /// Synchronous variant of [`TaskLocalContext::scope`].
    pub fn sync_scope<R>(source: Arc<dyn CorrelationSource>, f: impl FnOnce() -> R) -> R {
        CURRENT_SOURCE.sync_scope(source, f)
    }
}

impl ContextAccessor for TaskLocalContext {
    fn current(&self) -> Option<Arc<dyn CorrelationSource>> {
        CURRENT_SOURCE.try_with(Arc::clone).ok()
    }
}

/// Always yields the same source (or none).
#[derive(Clone, Default)]
pub struct FixedContext(Option<Arc<dyn CorrelationSource>>);

impl FixedContext {
    pub fn new(source: Arc<dyn CorrelationSource>) -> Self {
        Self(Some(source))
    }

    pub fn empty() -> Self {
        Self(None)
    }
}

impl ContextAccessor for FixedContext {
    fn current(&self) -> Option<Arc<dyn CorrelationSource>> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::source::{SourceKey, StaticSource};

    fn source(value: &str) -> Arc<dyn CorrelationSource> {
        Arc::new(StaticSource::new().with(SourceKey::request_header("h"), value))
    }

    fn read(accessor: &dyn ContextAccessor) -> Option<String> {
        accessor
            .current()
            .and_then(|s| s.lookup(&SourceKey::request_header("h")).ok().flatten())
    }

    #[test]
    fn test_task_local_outside_scope() {
        assert!(TaskLocalContext.current().is_none());
    }

    #[test]
    fn test_sync_scope() {
        let seen = TaskLocalContext::sync_scope(source("a"), || read(&TaskLocalContext));
        assert_eq!(seen.as_deref(), Some("a"));
        assert!(TaskLocalContext.current().is_none());
    }

    #[tokio::test]
    async fn test_async_scopes_are_isolated() {
        let a = tokio::spawn(TaskLocalContext::scope(source("a"), async {
            tokio::task::yield_now().await;
            read(&TaskLocalContext)
        }));
        let b = tokio::spawn(TaskLocalContext::scope(source("b"), async {
            tokio::task::yield_now().await;
            read(&TaskLocalContext)
        }));

        assert_eq!(a.await.unwrap().as_deref(), Some("a"));
        assert_eq!(b.await.unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_fixed_context() {
        assert_eq!(read(&FixedContext::new(source("x"))).as_deref(), Some("x"));
        assert!(FixedContext::empty().current().is_none());
    }
}
