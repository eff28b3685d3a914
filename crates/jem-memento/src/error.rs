use thiserror::Error;

use crate::node::NodeKind;

pub type Result<T, E = MementoError> = std::result::Result<T, E>;

/// Reasons a memento is rejected outright.
///
/// Truncated tails and missing live elements are not errors: the decoder returns the deepest
/// parsed element or a placeholder instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MementoError {
    #[error("memento does not start with a project segment")]
    BogusMemento,
    #[error("dangling escape character at the end of a payload")]
    DanglingEscape,
    #[error("invalid {field}: `{value}`")]
    InvalidField { field: &'static str, value: String },
}

/// Violations of the containment rules when building a [`HandlePath`](crate::HandlePath).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("handle path is empty")]
    Empty,
    #[error("handle path must start with a project, found {0:?}")]
    NotAProject(NodeKind),
    #[error("{child:?} cannot be nested under {parent:?}")]
    InvalidChild { parent: NodeKind, child: NodeKind },
    #[error("occurrence count of {0:?} must be at least 1")]
    ZeroOccurrence(NodeKind),
    #[error("{0:?} requires a non-empty name")]
    EmptyName(NodeKind),
    #[error("method parameter type {index} is empty")]
    EmptyParameterType { index: usize },
}
