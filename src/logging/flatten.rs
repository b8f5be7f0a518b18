//! Error flattening.
//!
//! # Responsibilities
//! - Classify errors through the [`ErrorNode`] capability set
//! - Produce an ordered, lazy sequence of [`ExceptionRecord`]s
//!
//! # Ordering
//! ```text
//! composite [e1, e2, e3]   → e1, e2, e3          (children only, no causes)
//! composite [c[a, b], e3]  → a, b, e3            (nested composites expand in place)
//! chain e1 → e2 → e3       → e1, e2, e3
//! chain e1 → composite[a]  → e1, a
//! ```
//!
//! # Design Decisions
//! - A failing `cause()` or an exhausted depth budget ends the sequence with
//!   one fallback record instead of an error
//! - The depth budget also counts nested composite expansions, so cyclic
//!   structures of either kind terminate

use std::borrow::Cow;
use thiserror::Error;

/// Default bound on cause-chain depth and composite nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Placeholder for missing kind, message or detail.
pub const NOT_AVAILABLE: &str = "N/A";

/// Message of the record emitted when flattening has to stop early.
pub const SWALLOWED_MESSAGE: &str = "Swallowed exception during getting inner exceptions.";

/// Obtaining an error's cause failed.
#[derive(Debug, Clone, Error)]
#[error("failed to read cause: {0}")]
pub struct CauseError(pub String);

/// Classification interface for loggable errors.
pub trait ErrorNode {
    /// Type or category name.
    fn kind(&self) -> Cow<'_, str>;

    fn message(&self) -> Cow<'_, str>;

    /// Trace or other diagnostic detail.
    fn detail(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// True for aggregates of independent child errors.
    fn is_composite(&self) -> bool {
        false
    }

    /// Children of a composite, in declaration order.
    fn children(&self) -> Vec<&dyn ErrorNode> {
        Vec::new()
    }

    /// The directly wrapped cause.
    fn cause(&self) -> Result<Option<&dyn ErrorNode>, CauseError> {
        Ok(None)
    }
}

/// Flattened view of one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRecord {
    pub kind: String,
    pub message: String,
    pub detail: String,
}

impl ExceptionRecord {
    pub fn from_node(node: &dyn ErrorNode) -> Self {
        Self {
            kind: or_not_available(Some(node.kind())),
            message: or_not_available(Some(node.message())),
            detail: or_not_available(node.detail()),
        }
    }

    /// Record used when there is no error to describe.
    pub fn not_available() -> Self {
        Self {
            kind: NOT_AVAILABLE.to_string(),
            message: NOT_AVAILABLE.to_string(),
            detail: NOT_AVAILABLE.to_string(),
        }
    }

    /// Fallback record ending a truncated sequence.
    pub fn swallowed(reason: impl Into<String>) -> Self {
        Self {
            kind: "FlattenFailure".to_string(),
            message: SWALLOWED_MESSAGE.to_string(),
            detail: reason.into(),
        }
    }
}

fn or_not_available(value: Option<Cow<'_, str>>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.into_owned(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

enum State<'a> {
    /// Next node of a cause chain, at the given depth.
    Chain(&'a dyn ErrorNode, usize),
    /// Pending siblings with their own depth, stored reversed so `pop` yields them in order.
    Siblings(Vec<(&'a dyn ErrorNode, usize)>),
    Failed(String),
    Done,
}

/// Lazy iterator returned by [`flatten`].
pub struct Flatten<'a> {
    state: State<'a>,
    max_depth: usize,
}

impl<'a> Flatten<'a> {
    fn depth_exceeded(&self) -> State<'a> {
        State::Failed(format!("error nesting deeper than {} levels", self.max_depth))
    }

    fn expand(
        &self,
        composite: &'a dyn ErrorNode,
        mut pending: Vec<(&'a dyn ErrorNode, usize)>,
        depth: usize,
    ) -> State<'a> {
        if depth >= self.max_depth {
            return self.depth_exceeded();
        }
        pending.extend(composite.children().into_iter().rev().map(|child| (child, depth + 1)));
        State::Siblings(pending)
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = ExceptionRecord;

    fn next(&mut self) -> Option<ExceptionRecord> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Done => return None,
                State::Failed(reason) => return Some(ExceptionRecord::swallowed(reason)),
                State::Chain(node, depth) => {
                    if node.is_composite() {
                        self.state = self.expand(node, Vec::new(), depth);
                        continue;
                    }
                    self.state = match node.cause() {
                        Ok(Some(_)) if depth + 1 >= self.max_depth => self.depth_exceeded(),
                        Ok(Some(cause)) => State::Chain(cause, depth + 1),
                        Ok(None) => State::Done,
                        Err(e) => State::Failed(e.to_string()),
                    };
                    return Some(ExceptionRecord::from_node(node));
                }
                State::Siblings(mut pending) => {
                    let (node, depth) = pending.pop()?;
                    if node.is_composite() {
                        self.state = self.expand(node, pending, depth);
                        continue;
                    }
                    self.state = State::Siblings(pending);
                    return Some(ExceptionRecord::from_node(node));
                }
            }
        }
    }
}

/// Flatten `err` with the default depth bound.
pub fn flatten(err: Option<&dyn ErrorNode>) -> Flatten<'_> {
    flatten_with_depth(err, DEFAULT_MAX_DEPTH)
}

/// Flatten `err`, stopping with a fallback record past `max_depth` levels.
pub fn flatten_with_depth(err: Option<&dyn ErrorNode>, max_depth: usize) -> Flatten<'_> {
    let state = match err {
        Some(node) => State::Chain(node, 0),
        None => State::Done,
    };
    Flatten {
        state,
        max_depth: max_depth.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::fault::Fault;

    fn messages(records: impl Iterator<Item = ExceptionRecord>) -> Vec<String> {
        records.map(|r| r.message).collect()
    }

    #[test]
    fn test_none_is_empty() {
        assert_eq!(flatten(None).count(), 0);
    }

    #[test]
    fn test_composite_yields_children_only() {
        let e1 = Fault::new("Io", "e1").caused_by(Fault::new("Inner", "grandchild"));
        let e2 = Fault::new("Io", "e2");
        let e3 = Fault::new("Parse", "e3");
        let composite = Fault::composite("Aggregate", "many", vec![e1, e2, e3]);

        let records: Vec<_> = flatten(Some(&composite)).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(messages(records.clone().into_iter()), vec!["e1", "e2", "e3"]);
        assert_eq!(records[2].kind, "Parse");
    }

    #[test]
    fn test_chain_yields_each_link() {
        let chain = Fault::new("Outer", "e1").caused_by(Fault::new("Middle", "e2").caused_by(Fault::new("Root", "e3")));
        assert_eq!(messages(flatten(Some(&chain))), vec!["e1", "e2", "e3"]);
    }

    #[test]
    fn test_nested_composites_expand_in_place() {
        let inner = Fault::composite("Aggregate", "inner", vec![Fault::new("A", "a"), Fault::new("B", "b")]);
        let outer = Fault::composite("Aggregate", "outer", vec![inner, Fault::new("C", "c")]);
        assert_eq!(messages(flatten(Some(&outer))), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chain_into_composite() {
        let err = Fault::new("Outer", "top").caused_by(Fault::composite(
            "Aggregate",
            "fan-out",
            vec![Fault::new("A", "a"), Fault::new("B", "b")],
        ));
        assert_eq!(messages(flatten(Some(&err))), vec!["top", "a", "b"]);
    }

    #[test]
    fn test_missing_fields_are_not_available() {
        let record = ExceptionRecord::from_node(&Fault::new("", ""));
        assert_eq!(record, ExceptionRecord::not_available());

        let record = ExceptionRecord::from_node(&Fault::new("Kind", "msg").with_detail("at main"));
        assert_eq!(record.detail, "at main");
    }

    struct Broken;

    impl ErrorNode for Broken {
        fn kind(&self) -> Cow<'_, str> {
            Cow::Borrowed("Broken")
        }

        fn message(&self) -> Cow<'_, str> {
            Cow::Borrowed("outer")
        }

        fn cause(&self) -> Result<Option<&dyn ErrorNode>, CauseError> {
            Err(CauseError("cause accessor threw".into()))
        }
    }

    #[test]
    fn test_failing_cause_emits_fallback() {
        let records: Vec<_> = flatten(Some(&Broken)).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "outer");
        assert_eq!(records[1].message, SWALLOWED_MESSAGE);
        assert!(records[1].detail.contains("cause accessor threw"));
    }

    struct Cyclic;

    impl ErrorNode for Cyclic {
        fn kind(&self) -> Cow<'_, str> {
            Cow::Borrowed("Cyclic")
        }

        fn message(&self) -> Cow<'_, str> {
            Cow::Borrowed("again")
        }

        fn cause(&self) -> Result<Option<&dyn ErrorNode>, CauseError> {
            Ok(Some(self))
        }
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        let records: Vec<_> = flatten_with_depth(Some(&Cyclic), 5).collect();
        assert_eq!(records.len(), 6);
        assert!(records[..5].iter().all(|r| r.message == "again"));
        assert_eq!(records[5].message, SWALLOWED_MESSAGE);
    }

    struct SelfAggregate;

    impl ErrorNode for SelfAggregate {
        fn kind(&self) -> Cow<'_, str> {
            Cow::Borrowed("SelfAggregate")
        }

        fn message(&self) -> Cow<'_, str> {
            Cow::Borrowed("loop")
        }

        fn is_composite(&self) -> bool {
            true
        }

        fn children(&self) -> Vec<&dyn ErrorNode> {
            vec![self]
        }
    }

    #[test]
    fn test_cyclic_composite_terminates() {
        let records: Vec<_> = flatten_with_depth(Some(&SelfAggregate), 3).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, SWALLOWED_MESSAGE);
    }

    #[test]
    fn test_sibling_composites_share_parent_depth() {
        let children: Vec<Fault> = (0..70)
            .map(|i| Fault::composite("Aggregate", format!("group {}", i), vec![Fault::new("Leaf", format!("e{}", i))]))
            .collect();
        let outer = Fault::composite("Aggregate", "outer", children);

        let records: Vec<_> = flatten(Some(&outer)).collect();
        assert_eq!(records.len(), 70);
        assert!(records.iter().all(|r| r.message != SWALLOWED_MESSAGE));
        assert_eq!(records[69].message, "e69");
    }

    #[test]
    fn test_depth_limit_is_per_branch() {
        let deep = Fault::composite(
            "Aggregate",
            "d1",
            vec![Fault::composite("Aggregate", "d2", vec![Fault::new("Leaf", "deep")])],
        );
        let outer = Fault::composite("Aggregate", "d0", vec![Fault::new("Leaf", "shallow"), deep]);

        let records: Vec<_> = flatten_with_depth(Some(&outer), 2).collect();
        assert_eq!(messages(records.into_iter()), vec!["shallow", SWALLOWED_MESSAGE]);
        assert_eq!(messages(flatten_with_depth(Some(&outer), 3)), vec!["shallow", "deep"]);
    }

    #[test]
    fn test_is_lazy() {
        let mut iter = flatten_with_depth(Some(&Cyclic), usize::MAX);
        assert_eq!(iter.next().unwrap().message, "again");
        assert_eq!(iter.next().unwrap().message, "again");
    }
}
