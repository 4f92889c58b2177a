use std::fmt;

use crate::arena::NodeRef;
use crate::node::Node;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub enum BoundaryPointPosition {
    Before,
    Equal,
    After,
}

// SPECLINK: https://dom.spec.whatwg.org/#boundary-points
/// A boundary point is a tuple consisting of a node and a non-negative
/// offset. The offset counts characters when the node is character data and
/// children otherwise.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryPoint<'a> {
    pub node: NodeRef<'a>,
    pub offset: usize,
}

impl PartialEq for BoundaryPoint<'_> {
    fn eq(&self, other: &Self) -> bool {
        Node::are_same(self.node, other.node) && self.offset == other.offset
    }
}

impl Eq for BoundaryPoint<'_> {}

impl fmt::Display for BoundaryPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.node, self.offset)
    }
}

impl<'a> BoundaryPoint<'a> {
    pub fn new(node: NodeRef<'a>, offset: usize) -> Self {
        Self { node, offset }
    }

    pub fn verify_correctness(&self) -> bool {
        // A correct boundary point’s offset will be between 0 and the boundary point’s node’s length, inclusive.
        self.offset <= self.node.length()
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-range-bp-position
    /// The tree-order position of `self` relative to `relative_to`. Both
    /// points must share a root.
    pub fn position(&self, relative_to: &BoundaryPoint<'a>) -> BoundaryPointPosition {
        debug_assert!(Node::have_same_root(self.node, relative_to.node));

        // If both points are in the same node, the offsets decide.
        if Node::are_same(self.node, relative_to.node) {
            return match self.offset.cmp(&relative_to.offset) {
                std::cmp::Ordering::Less => BoundaryPointPosition::Before,
                std::cmp::Ordering::Equal => BoundaryPointPosition::Equal,
                std::cmp::Ordering::Greater => BoundaryPointPosition::After,
            };
        }

        // If our node is an ancestor of theirs, compare our offset with the
        // index of the child that leads down to their node.
        if let Some(child) = self.node.child_towards(relative_to.node) {
            return match self.offset <= child.index() {
                true => BoundaryPointPosition::Before,
                false => BoundaryPointPosition::After,
            };
        }

        // The same, the other way around.
        if let Some(child) = relative_to.node.child_towards(self.node) {
            return match relative_to.offset <= child.index() {
                true => BoundaryPointPosition::After,
                false => BoundaryPointPosition::Before,
            };
        }

        // Otherwise the children of the lowest common ancestor on both paths
        // are distinct siblings, and their order is the order of the points.
        let siblings = Node::common_ancestor(self.node, relative_to.node).and_then(|ancestor| {
            Some((
                ancestor.child_towards(self.node)?,
                ancestor.child_towards(relative_to.node)?,
            ))
        });
        match siblings {
            Some((ours, theirs)) if ours.index() > theirs.index() => BoundaryPointPosition::After,
            _ => BoundaryPointPosition::Before,
        }
    }

    pub fn is_before(&self, other: &BoundaryPoint<'a>) -> bool {
        self.position(other) == BoundaryPointPosition::Before
    }

    pub fn is_after(&self, other: &BoundaryPoint<'a>) -> bool {
        self.position(other) == BoundaryPointPosition::After
    }
}

pub trait AbstractRange<'a> {
    fn start(&self) -> &BoundaryPoint<'a>;

    fn end(&self) -> &BoundaryPoint<'a>;

    fn start_container(&self) -> NodeRef<'a> {
        self.start().node
    }

    fn start_offset(&self) -> usize {
        self.start().offset
    }

    fn end_container(&self) -> NodeRef<'a> {
        self.end().node
    }

    fn end_offset(&self) -> usize {
        self.end().offset
    }

    fn collapsed(&self) -> bool {
        self.start() == self.end()
    }
}
