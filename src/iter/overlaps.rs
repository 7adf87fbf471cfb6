use crate::{
    interval::Interval,
    node::{Arena, NodeId},
};

/// An in-order iterator yielding every interval in an
/// [`IntervalTreap`](crate::IntervalTreap) that overlaps a query interval.
///
/// A subtree is only descended into when its bounding interval
/// `[minimum lower bound, imax]` overlaps the query; every interval in the
/// subtree lies within that bound, so a disjoint bound proves the subtree
/// holds no matches.
#[derive(Debug)]
pub struct Overlaps<'a, 'q, T> {
    nodes: &'a Arena<T>,
    query: &'q Interval<T>,
    stack: Vec<NodeId>,
}

impl<'a, 'q, T> Overlaps<'a, 'q, T>
where
    T: Ord,
{
    pub(crate) fn new(nodes: &'a Arena<T>, root: Option<NodeId>, query: &'q Interval<T>) -> Self {
        let mut this = Self {
            nodes,
            query,
            stack: vec![],
        };

        if let Some(root) = root.filter(|&v| this.may_overlap(v)) {
            this.push_subtree(root);
        }

        this
    }

    /// Returns true if the subtree rooted at `subtree_root` may contain an
    /// interval overlapping the query.
    fn may_overlap(&self, subtree_root: NodeId) -> bool {
        if self.nodes[subtree_root].imax() < self.query.low() {
            return false;
        }

        // Descend the left edge towards the subtree minimum, stopping at the
        // first lower bound that does not exceed the query.
        let mut ptr = Some(subtree_root);
        while let Some(v) = ptr {
            let n = &self.nodes[v];
            if n.interval().low() <= self.query.high() {
                return true;
            }
            ptr = n.left();
        }

        false
    }

    /// Push `subtree_root` and then descend down its left edge for as long as
    /// the left subtrees may contain an overlap.
    fn push_subtree(&mut self, subtree_root: NodeId) {
        let mut ptr = Some(subtree_root);

        while let Some(v) = ptr {
            self.stack.push(v);
            ptr = self.nodes[v].left().filter(|&l| self.may_overlap(l));
        }
    }
}

impl<'a, 'q, T> Iterator for Overlaps<'a, 'q, T>
where
    T: Ord,
{
    type Item = (NodeId, &'a Interval<T>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            let nodes = self.nodes;
            let v = &nodes[id];

            // Push the right subtree to be visited next, unless pruned.
            //
            // Every lower bound in the right subtree is at least that of "v",
            // so it cannot overlap when "v" starts after the query ends.
            let right = v
                .right()
                .filter(|_| v.interval().low() <= self.query.high())
                .filter(|&r| self.may_overlap(r));
            if let Some(right) = right {
                self.push_subtree(right);
            }

            // Yield this node if it overlaps with the query.
            if v.interval().overlaps(self.query) {
                return Some((id, v.interval()));
            }
        }
    }
}
