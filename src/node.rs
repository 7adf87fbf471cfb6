use std::{
    fmt::Display,
    ops::{Index, IndexMut},
};

use rand::Rng;

use crate::interval::Interval;

/// A handle to a [`Node`] stored in an [`IntervalTreap`].
///
/// Handles are generational: once the node is deleted, the handle no longer
/// resolves, even if the underlying storage slot is reused by a later
/// insert.
///
/// [`IntervalTreap`]: crate::IntervalTreap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// A single interval stored in an [`IntervalTreap`], along with the treap
/// priority and cached subtree properties.
///
/// [`IntervalTreap`]: crate::IntervalTreap
#[derive(Debug, Clone)]
pub struct Node<T> {
    interval: Interval<T>,

    /// The heap key of this node, drawn once at construction.
    ///
    /// Lower values sit closer to the root.
    priority: u32,

    /// The maximum upper bound of all intervals for the subtree rooted at this
    /// [`Node`].
    pub(crate) imax: T,

    /// The height of the subtree rooted at this node.
    ///
    /// A leaf has a height of 0.
    pub(crate) height: u32,

    /// Non-owning links into the arena.
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<T> Node<T> {
    /// Construct an unlinked [`Node`] for `interval`, drawing its priority
    /// uniformly from `1..=u32::MAX` using `rng`.
    pub fn new<R>(interval: Interval<T>, rng: &mut R) -> Self
    where
        T: Clone,
        R: Rng,
    {
        Self::with_priority(interval, rng.gen_range(1..=u32::MAX))
    }

    /// Construct an unlinked [`Node`] with a caller-chosen `priority`.
    ///
    /// The treap only stays balanced in expectation when priorities are
    /// independent and uniformly distributed; this constructor exists to build
    /// specific tree shapes.
    pub fn with_priority(interval: Interval<T>, priority: u32) -> Self
    where
        T: Clone,
    {
        Self {
            imax: interval.high().clone(),
            interval,
            priority,
            height: 0,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// The interval held by this node.
    pub fn interval(&self) -> &Interval<T> {
        &self.interval
    }

    /// The heap priority of this node; lower values sit closer to the root.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// The maximum upper bound of all intervals in the subtree rooted at this
    /// node.
    pub fn imax(&self) -> &T {
        &self.imax
    }

    /// The height of the subtree rooted at this node, 0 for a leaf.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The parent of this node, or [`None`] for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The left child, holding intervals with lower bounds no greater than
    /// this node's.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The right child, holding intervals with lower bounds no less than
    /// this node's.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub(crate) fn into_interval(self) -> Interval<T> {
        self.interval
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Owning storage for every [`Node`] of a treap, addressed by [`NodeId`].
///
/// Freed slots are recycled through a free list, bumping the slot generation
/// so stale handles stop resolving.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Take ownership of `node`, returning the handle to address it by.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots are allocated.
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.node.is_none());
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = u32::try_from(self.slots.len()).expect("arena slot index overflow");
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });

        NodeId {
            index,
            generation: 0,
        }
    }

    /// Remove the node addressed by `id`, returning it if `id` was live.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<T>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }

        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots
            .get(id.index as usize)
            .filter(|v| v.generation == id.generation)
            .and_then(|v| v.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|v| v.generation == id.generation)
            .and_then(|v| v.node.as_mut())
    }

    /// Descend the left-most edge of the subtree rooted at `id`, returning the
    /// node holding the minimum lower bound in that subtree.
    pub(crate) fn subtree_min(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    /// Drop every node, keeping the slots (and their generations) so handles
    /// issued before the clear stay stale.
    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
    }
}

/// Resolve a link held inside the tree.
///
/// # Panics
///
/// Panics if `id` is stale, which indicates a corrupted link.
impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("dangling node link")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("dangling node link")
    }
}
