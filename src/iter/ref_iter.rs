use crate::{
    interval::Interval,
    node::{Arena, NodeId},
};

/// An in-order iterator over the intervals of an
/// [`IntervalTreap`](crate::IntervalTreap), yielding them in ascending
/// lower bound order.
#[derive(Debug)]
pub struct Iter<'a, T> {
    nodes: &'a Arena<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a Arena<T>, root: Option<NodeId>) -> Self {
        let mut this = Self {
            nodes,
            stack: vec![],
        };

        // Descend down the left side of the tree.
        if let Some(root) = root {
            this.push_subtree(root);
        }

        this
    }

    fn push_subtree(&mut self, subtree_root: NodeId) {
        let mut ptr = Some(subtree_root);

        while let Some(v) = ptr {
            self.stack.push(v);
            ptr = self.nodes[v].left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a Interval<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let nodes = self.nodes;
        let v = &nodes[id];

        // Descend down the left side of the right hand child of this node, if
        // any.
        if let Some(right) = v.right() {
            self.push_subtree(right);
        }

        Some((id, v.interval()))
    }
}
