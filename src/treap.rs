use std::cmp::Ordering;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::{
    error::Error,
    interval::Interval,
    iter::{Iter, Overlaps},
    node::{Arena, Node, NodeId},
};

/// An interval treap: a binary search tree of [`Interval`] keyed by lower
/// bound, balanced in expectation by random node priorities, and augmented
/// with the maximum upper bound of each subtree.
///
/// Nodes are ordered by lower bound and form a min-heap on priority. An
/// interval with a lower bound equal to an existing node is inserted into its
/// right subtree, though rotations may later move it to either side.
///
/// Every node caches the maximum upper bound ("imax") and height of the
/// subtree rooted at it, which allows overlap queries to prune subtrees that
/// cannot contain a match.
///
/// Node priorities are drawn from the generator `R`.
#[derive(Debug, Clone)]
pub struct IntervalTreap<T, R = StdRng> {
    nodes: Arena<T>,
    root: Option<NodeId>,
    len: usize,
    rng: R,
}

impl<T> Default for IntervalTreap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalTreap<T> {
    /// Construct an empty treap drawing priorities from an entropy-seeded
    /// [`StdRng`].
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Construct an empty treap with a deterministic priority sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<T, R> IntervalTreap<T, R> {
    /// Construct an empty treap drawing priorities from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self::with_rng_and_capacity(rng, 0)
    }

    /// Construct an empty treap drawing priorities from `rng`, with space
    /// preallocated for `capacity` nodes.
    pub fn with_rng_and_capacity(rng: R, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            rng,
        }
    }

    /// The number of intervals stored in the treap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the treap holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The height of the treap, which is 0 for both an empty treap and a
    /// treap of one node.
    pub fn height(&self) -> u32 {
        self.root
            .map(|v| self.nodes[v].height())
            .unwrap_or_default()
    }

    /// The handle of the root node, or [`None`] when the treap is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Resolve `id` to the [`Node`] it addresses, if it is still linked into
    /// the treap.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id)
    }

    /// Iterate over all intervals in ascending lower bound order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root)
    }

    /// Remove all intervals.
    ///
    /// All previously issued [`NodeId`] are invalidated.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }
}

impl<T, R> IntervalTreap<T, R>
where
    T: Ord + Clone,
{
    /// Link `node` into the treap, returning the handle that addresses it.
    ///
    /// Any links or cached subtree state carried by `node` (for example, when
    /// cloned from another treap) are discarded.
    pub fn insert(&mut self, mut node: Node<T>) -> NodeId {
        node.imax = node.interval().high().clone();
        node.height = 0;
        node.parent = None;
        node.left = None;
        node.right = None;

        // Descend to the insertion point, raising the subtree max of each
        // ancestor to account for the new interval.
        let mut parent = None;
        let mut link_left = false;
        let mut ptr = self.root;
        while let Some(v) = ptr {
            let n = &mut self.nodes[v];
            if n.imax < *node.interval().high() {
                n.imax = node.interval().high().clone();
            }

            parent = Some(v);
            link_left = node.interval().low() < n.interval().low();
            ptr = if link_left { n.left } else { n.right };
        }

        let priority = node.priority();
        let id = self.nodes.alloc(node);
        match parent {
            None => self.root = Some(id),
            Some(p) if link_left => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }
        self.nodes[id].parent = parent;
        self.len += 1;

        // Restore the heap order by rotating the new node up until its
        // parent has a strictly lower priority.
        let mut rotations = 0_usize;
        while let Some(p) = self.nodes[id].parent {
            if priority > self.nodes[p].priority() {
                break;
            }
            self.rotate_up(id);
            rotations += 1;
        }

        // Rotations reshape subtrees above the node that the descent did not
        // account for.
        self.repair_upwards(Some(id));

        trace!(node = %id, priority, rotations, len = self.len, "inserted interval");

        id
    }

    /// Unlink and free the node addressed by `id`, returning the interval it
    /// held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if `id` does not address a live node, in
    /// which case the treap is not modified.
    ///
    /// A [`NodeId`] issued by a different treap is not reliably detected and
    /// must not be passed.
    pub fn delete(&mut self, id: NodeId) -> Result<Interval<T>, Error> {
        let Some(n) = self.nodes.get(id) else {
            debug!(node = %id, "rejected delete of unknown node");
            return Err(Error::UnknownNode(id));
        };

        let (parent, left, right) = (n.parent, n.left, n.right);

        let mut rotations = 0_usize;
        match (left, right) {
            (None, None) => {
                // A leaf, or the only node in the treap.
                self.relink(parent, id, None);
                self.repair_upwards(parent);
            }
            (Some(child), None) | (None, Some(child)) => {
                self.relink(parent, id, Some(child));
                self.repair_upwards(Some(child));
            }
            (Some(left), Some(right)) => {
                // Replace the node with its in-order successor, the minimum of
                // the right subtree.
                //
                //                  +------+
                //                  |  id  |
                //                  +------+
                //                  /      \
                //              left        right
                //                         /
                //                       ...
                //                       /
                //                 successor
                //                        \
                //                         successor.right
                //
                // The successor has no left child. If it is not "right"
                // itself, its right subtree takes its place under its parent,
                // and it adopts "right".
                let successor = self.nodes.subtree_min(right);

                let repair_from = if successor == right {
                    successor
                } else {
                    let successor_parent = self.nodes[successor]
                        .parent
                        .expect("successor below right child must have a parent");
                    debug_assert_eq!(self.nodes[successor_parent].left, Some(successor));

                    let successor_right = self.nodes[successor].right;
                    self.nodes[successor_parent].left = successor_right;
                    if let Some(v) = successor_right {
                        self.nodes[v].parent = Some(successor_parent);
                    }

                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);

                    successor_parent
                };

                debug_assert!(self.nodes[successor].left.is_none());
                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);
                self.relink(parent, id, Some(successor));

                // The successor is an ancestor of "repair_from", so this
                // repairs it and every node above it.
                self.repair_upwards(Some(repair_from));

                rotations = self.sift_down(successor);
                if rotations > 0 {
                    self.repair_upwards(Some(successor));
                }
            }
        }

        let node = self
            .nodes
            .free(id)
            .expect("node resolved at the start of delete");
        self.len -= 1;

        trace!(node = %id, rotations, len = self.len, "deleted interval");

        Ok(node.into_interval())
    }

    /// Remove one interval exactly equal to `interval`, if any, returning it.
    pub fn remove(&mut self, interval: &Interval<T>) -> Option<Interval<T>> {
        let id = self.exact_search(interval)?;
        self.delete(id).ok()
    }

    /// Find a node holding an interval exactly equal to `query`.
    ///
    /// When the treap holds duplicates of `query`, any one of them may be
    /// returned.
    pub fn exact_search(&self, query: &Interval<T>) -> Option<NodeId> {
        self.exact_search_in(self.root, query)
    }

    fn exact_search_in(&self, subtree: Option<NodeId>, query: &Interval<T>) -> Option<NodeId> {
        // Prune this subtree from the search if the maximum upper bound in the
        // subtree is less than the search upper bound. If true, this subtree
        // cannot contain the search interval.
        let v = subtree.filter(|v| self.nodes[*v].imax() >= query.high())?;

        let n = &self.nodes[v];
        if n.interval() == query {
            return Some(v);
        }

        match query.low().cmp(n.interval().low()) {
            Ordering::Less => self.exact_search_in(n.left, query),
            Ordering::Greater => self.exact_search_in(n.right, query),
            // Inserts place equal lower bounds on the right, but rotations
            // may since have moved them into either subtree.
            Ordering::Equal => self
                .exact_search_in(n.right, query)
                .or_else(|| self.exact_search_in(n.left, query)),
        }
    }

    /// Returns true if the treap holds an interval exactly equal to `query`.
    pub fn contains(&self, query: &Interval<T>) -> bool {
        self.exact_search(query).is_some()
    }

    /// Find any one node holding an interval that overlaps `query`.
    pub fn overlap_search(&self, query: &Interval<T>) -> Option<NodeId> {
        let mut ptr = self.root;
        while let Some(v) = ptr {
            let n = &self.nodes[v];
            if n.interval().overlaps(query) {
                return Some(v);
            }

            // If the left subtree reaches far enough right to overlap, either
            // it holds a match or no match exists at all.
            ptr = match n.left {
                Some(l) if self.nodes[l].imax() >= query.low() => Some(l),
                _ => n.right,
            };
        }

        None
    }

    /// Iterate over every interval that overlaps `query`, in ascending lower
    /// bound order.
    pub fn overlaps<'a, 'q>(&'a self, query: &'q Interval<T>) -> Overlaps<'a, 'q, T> {
        Overlaps::new(&self.nodes, self.root, query)
    }

    /// Collect every interval that overlaps `query`.
    pub fn overlapping_intervals(&self, query: &Interval<T>) -> Vec<&Interval<T>> {
        self.overlaps(query).map(|(_, v)| v).collect()
    }

    /// Rotate `x` above its parent, preserving the BST order.
    ///
    /// A left child is right rotated, a right child left rotated:
    ///
    /// ```text
    ///          p                               x
    ///         / \                             / \
    ///        x   3     Rotate Right          1   p
    ///       / \      --------------->           / \
    ///      1   b                               b   3
    ///
    ///      p                                   x
    ///     / \                                 / \
    ///    1   x         Rotate Left           p   3
    ///       / \      --------------->       / \
    ///      b   3                           1   b
    /// ```
    ///
    /// The subtree height of the ancestors of `x` may change, and must be
    /// repaired by the caller.
    fn rotate_up(&mut self, x: NodeId) {
        let Some(p) = self.nodes[x].parent else {
            debug_assert!(false, "cannot rotate the root up");
            return;
        };
        let grandparent = self.nodes[p].parent;

        let b = if self.nodes[p].left == Some(x) {
            let b = self.nodes[x].right;
            self.nodes[p].left = b;
            self.nodes[x].right = Some(p);
            b
        } else {
            let b = self.nodes[x].left;
            self.nodes[p].right = b;
            self.nodes[x].left = Some(p);
            b
        };

        if let Some(b) = b {
            self.nodes[b].parent = Some(p);
        }
        self.relink(grandparent, p, Some(x));
        self.nodes[p].parent = Some(x);

        self.repair(p);
        self.repair(x);
    }

    /// Rotate `x` down until both children have a greater priority, or it
    /// becomes a leaf, returning the number of rotations performed.
    ///
    /// The child with the lower priority is rotated up, preferring the right
    /// child when priorities are equal.
    fn sift_down(&mut self, x: NodeId) -> usize {
        let mut rotations = 0;
        loop {
            let n = &self.nodes[x];
            let priority = n.priority();
            let left = n.left.map(|v| (v, self.nodes[v].priority()));
            let right = n.right.map(|v| (v, self.nodes[v].priority()));

            let child = match (left, right) {
                (Some((l, lp)), Some((r, rp))) if lp <= priority || rp <= priority => {
                    if lp < rp {
                        l
                    } else {
                        r
                    }
                }
                (Some((l, lp)), _) if lp <= priority => l,
                (_, Some((r, rp))) if rp <= priority => r,
                _ => return rotations,
            };

            self.rotate_up(child);
            rotations += 1;
        }
    }

    /// Point the child slot of `parent` that currently holds `old` at `new`
    /// (or the root, when `parent` is [`None`]), and set the parent link of
    /// `new` accordingly.
    fn relink(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => {
                debug_assert_eq!(self.root, Some(old));
                self.root = new;
            }
            Some(p) => {
                let n = &mut self.nodes[p];
                if n.left == Some(old) {
                    n.left = new;
                } else {
                    debug_assert_eq!(n.right, Some(old));
                    n.right = new;
                }
            }
        }

        if let Some(v) = new {
            self.nodes[v].parent = parent;
        }
    }

    /// Recompute the cached height and subtree max of `id` from its current
    /// children.
    fn repair(&mut self, id: NodeId) {
        let n = &self.nodes[id];
        let left = n.left.map(|v| &self.nodes[v]);
        let right = n.right.map(|v| &self.nodes[v]);

        let height = left
            .map(|v| v.height() + 1)
            .max(right.map(|v| v.height() + 1))
            .unwrap_or_default();

        let imax = left
            .map(|v| v.imax())
            .max(right.map(|v| v.imax()))
            .max(Some(n.interval().high()))
            .cloned();

        let n = &mut self.nodes[id];
        n.height = height;
        if let Some(imax) = imax {
            n.imax = imax;
        }
    }

    /// Repair `id` and every ancestor of it, up to the root.
    fn repair_upwards(&mut self, mut id: Option<NodeId>) {
        while let Some(v) = id {
            self.repair(v);
            id = self.nodes[v].parent;
        }
    }
}

impl<T, R> IntervalTreap<T, R>
where
    T: Ord + Clone,
    R: Rng,
{
    /// Insert `interval` in a new node, drawing its priority from the treap's
    /// generator.
    pub fn insert_interval(&mut self, interval: Interval<T>) -> NodeId {
        let node = Node::new(interval, &mut self.rng);
        self.insert(node)
    }
}

impl<T, R> Extend<Interval<T>> for IntervalTreap<T, R>
where
    T: Ord + Clone,
    R: Rng,
{
    fn extend<I: IntoIterator<Item = Interval<T>>>(&mut self, iter: I) {
        for v in iter {
            self.insert_interval(v);
        }
    }
}

impl<T> FromIterator<Interval<T>> for IntervalTreap<T>
where
    T: Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        let mut t = Self::new();
        t.extend(iter);
        t
    }
}
