//! Error types for frame graph operations.

use thiserror::Error;

/// A query referenced frames that cannot be related.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("frame '{0}' not found")]
    UnknownFrame(String),

    /// Both frames are known, but they live in different components of a forest.
    #[error("no transform path between '{from}' and '{to}'")]
    NoPath { from: String, to: String },
}

/// A construction or update would break the tree invariants.
///
/// Mutators that return this error leave the structure exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("invalid edge '{child}' -> '{parent}': {reason}")]
    InvalidEdge {
        child: String,
        parent: String,
        reason: FormatError,
    },

    #[error("frame '{child}' has more than one parent ('{first}' and '{second}')")]
    AmbiguousParent {
        child: String,
        first: String,
        second: String,
    },

    #[error("edge '{child}' -> '{parent}' would close a cycle")]
    Cycle { child: String, parent: String },

    /// Neither end of the edge is part of the tree being updated.
    #[error("edge '{child}' -> '{parent}' does not attach to any existing frame")]
    Orphan { child: String, parent: String },

    /// Both ends already have parents in separate components, so no splice keeps a single root.
    #[error("cannot merge components through '{child}' -> '{parent}': both frames already have parents")]
    AmbiguousMerge { child: String, parent: String },

    #[error("expected exactly one connected component, found {0} (roots: {1:?})")]
    Disconnected(usize, Vec<String>),
}

/// Malformed serialized input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("field `{field}` must have {expected} components, found {found}")]
    Arity {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("frame names must not be empty")]
    EmptyFrameName,

    #[error("child and parent must be different frames, both are '{0}'")]
    SameFrame(String),

    #[error("field `{0}` contains a non-finite value")]
    NonFinite(&'static str),
}

/// Any failure from the fallible entry points that both parse and validate input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result type for fallible frame graph operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LookupError::UnknownFrame("camera".to_string());
        assert_eq!(err.to_string(), "frame 'camera' not found");

        let err = GraphError::Orphan {
            child: "a".to_string(),
            parent: "b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "edge 'a' -> 'b' does not attach to any existing frame"
        );

        let err: Error = FormatError::Arity {
            field: "rotation",
            expected: 3,
            found: 2,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "field `rotation` must have 3 components, found 2"
        );
    }
}
