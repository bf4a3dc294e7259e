//! Errors raised while assembling an articulated model.
//!
//! Everything that runs per frame (grid edits, collision queries, camera moves,
//! animation) is total. The only failure path is building a segment tree from a
//! flat description, which is checked once up front.

use thiserror::Error;

/// Result type alias for model construction.
pub type RigResult<T> = Result<T, RigError>;

/// Errors that can occur while building an [`ArticulatedModel`](crate::data_structures::scene_graph::ArticulatedModel).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RigError {
    /// A mesh name did not match any known primitive template.
    #[error("unknown mesh kind `{0}`, expected `cube` or `cylinder`")]
    UnknownMeshKind(String),

    /// A segment names a parent that is not part of the description.
    #[error("segment `{segment}` references unknown parent `{parent}`")]
    UnknownParent { segment: String, parent: String },

    /// Two segments share a name.
    #[error("segment `{0}` is defined more than once")]
    DuplicateSegment(String),

    /// Following parent links from this segment loops back onto itself.
    #[error("segment `{0}` is part of a parent cycle")]
    CyclicParent(String),

    /// No segment without a parent exists.
    #[error("model has no root segment")]
    NoRoot,

    /// More than one segment has no parent.
    #[error("model has more than one root: `{0}` and `{1}`")]
    MultipleRoots(String, String),
}
