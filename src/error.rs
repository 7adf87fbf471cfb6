use thiserror::Error;

use crate::node::NodeId;

/// Errors returned by [`Interval`] construction and [`IntervalTreap`]
/// mutations.
///
/// [`Interval`]: crate::Interval
/// [`IntervalTreap`]: crate::IntervalTreap
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The lower bound of an interval is greater than its upper bound.
    #[error("interval lower bound is greater than its upper bound")]
    InvertedInterval,

    /// The [`NodeId`] does not refer to a node linked into the treap, either
    /// because it was already deleted or was never allocated.
    #[error("node {0} is not linked into this treap")]
    UnknownNode(NodeId),
}
