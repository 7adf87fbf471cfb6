//! An interval treap for efficient interval overlap queries.
//!
//! [`IntervalTreap`] stores a dynamic set of closed [`Interval`] in a binary
//! search tree ordered by lower bound, kept balanced in expectation by
//! assigning each node an independent random priority and maintaining heap
//! order on it. Each node is augmented with the maximum upper bound of its
//! subtree, allowing searches to skip subtrees that cannot overlap a query.
//!
//! Insert, delete, exact search and single overlap search all run in expected
//! `O(log n)` time. Enumerating all `k` intervals overlapping a query visits
//! only the subtrees that may contain a match.
//!
//! ```
//! use intreap::{Interval, IntervalTreap};
//!
//! let mut t = IntervalTreap::with_seed(42);
//!
//! for (low, high) in [(15, 20), (10, 30), (17, 19), (5, 11), (30, 40)] {
//!     t.insert_interval(Interval::new(low, high)?);
//! }
//!
//! let query = Interval::new(12, 18)?;
//! let got = t.overlapping_intervals(&query);
//! assert_eq!(got.len(), 3);
//!
//! // Remove one of the overlapping intervals by value.
//! let removed = t.remove(&Interval::new(10, 30)?);
//! assert!(removed.is_some());
//! assert_eq!(t.overlapping_intervals(&query).len(), 2);
//! # Ok::<(), intreap::Error>(())
//! ```
//!
//! Nodes are addressed by a generational [`NodeId`] handle, which stops
//! resolving once the node is deleted.
//!
//! The treap performs no internal synchronisation; all mutations require
//! `&mut self`.

mod error;
mod interval;
mod iter;
mod node;
mod treap;


pub use error::*;
pub use interval::*;
pub use iter::*;
pub use node::{Node, NodeId};
pub use treap::*;
