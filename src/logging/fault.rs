//! Owned error values that can be flattened.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use crate::logging::flatten::{CauseError, ErrorNode, DEFAULT_MAX_DEPTH};

/// An owned, loggable error: a single error with an optional cause, or a
/// composite of independent children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    kind: String,
    message: String,
    detail: Option<String>,
    cause: Option<Box<Fault>>,
    children: Vec<Fault>,
    composite: bool,
}

impl Fault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            detail: None,
            cause: None,
            children: Vec::new(),
            composite: false,
        }
    }

    /// An aggregate of independent errors, e.g. from concurrent fan-out.
    pub fn composite(kind: impl Into<String>, message: impl Into<String>, children: Vec<Fault>) -> Self {
        Self {
            children,
            composite: true,
            ..Self::new(kind, message)
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn caused_by(mut self, cause: Fault) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Capture `err` and its `source()` chain.
    ///
    /// The outermost kind is the error's type name; sources keep their kind
    /// when they are `Fault`s and are reported as `Error` otherwise.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: Error + 'static,
    {
        let mut fault = Self::new(short_type_name::<E>(), err.to_string()).with_detail(format!("{:?}", err));
        fault.cause = err.source().map(|s| Box::new(Self::from_source(s, 1)));
        fault
    }

    fn from_source(err: &(dyn Error + 'static), depth: usize) -> Self {
        if let Some(fault) = err.downcast_ref::<Fault>() {
            return fault.clone();
        }
        let mut fault = Self::new("Error", err.to_string()).with_detail(format!("{:?}", err));
        if depth < DEFAULT_MAX_DEPTH {
            fault.cause = err.source().map(|s| Box::new(Self::from_source(s, depth + 1)));
        }
        fault
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn children(&self) -> &[Fault] {
        &self.children
    }

    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

impl ErrorNode for Fault {
    fn kind(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.kind)
    }

    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.message)
    }

    fn detail(&self) -> Option<Cow<'_, str>> {
        self.detail.as_deref().map(Cow::Borrowed)
    }

    fn is_composite(&self) -> bool {
        self.composite
    }

    fn children(&self) -> Vec<&dyn ErrorNode> {
        self.children.iter().map(|c| c as &dyn ErrorNode).collect()
    }

    fn cause(&self) -> Result<Option<&dyn ErrorNode>, CauseError> {
        Ok(self.cause.as_deref().map(|c| c as &dyn ErrorNode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::flatten::flatten;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("request failed")]
    struct RequestFailed {
        #[source]
        source: std::io::Error,
    }

    #[test]
    fn test_from_error_walks_sources() {
        let err = RequestFailed {
            source: std::io::Error::new(std::io::ErrorKind::Other, "connection reset"),
        };
        let fault = Fault::from_error(&err);

        assert_eq!(fault.kind(), "RequestFailed");
        assert_eq!(fault.message(), "request failed");
        assert_eq!(fault.cause().unwrap().message(), "connection reset");

        let records: Vec<_> = flatten(Some(&fault)).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].kind, "Error");
    }

    #[test]
    fn test_from_error_keeps_fault_sources() {
        let inner = Fault::new("Timeout", "took too long");
        let outer = Fault::new("Outer", "wrapped").caused_by(inner.clone());
        let captured = Fault::from_error(&outer);

        assert_eq!(captured.kind(), "Fault");
        assert_eq!(captured.cause(), Some(&inner));
    }

    #[test]
    fn test_std_error_source() {
        let fault = Fault::new("Outer", "o").caused_by(Fault::new("Inner", "i"));
        let source = fault.source().unwrap();
        assert_eq!(source.to_string(), "Inner: i");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<std::io::Error>(), "Error");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }
}
