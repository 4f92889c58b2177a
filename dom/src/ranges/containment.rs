use crate::arena::NodeRef;
use crate::node::Node;
use crate::ranges::{BoundaryPoint, Range};

/// How a node relates to the span of a range.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Containment {
    /// The whole node lies between the boundary points.
    Contained,
    /// The node is an inclusive ancestor of exactly one boundary point's node.
    PartiallyContained,
    NotContained,
}

impl<'a> Range<'a> {
    pub fn containment(&self, node: NodeRef<'a>) -> Containment {
        if self.contains_node(node) {
            Containment::Contained
        } else if self.partially_contains_node(node) {
            Containment::PartiallyContained
        } else {
            Containment::NotContained
        }
    }

    // SPECLINK: https://dom.spec.whatwg.org/#contained
    /// A node is contained in a range if its root is the range's root, and
    /// (node, 0) is after the start and (node, length) is before the end.
    ///
    /// An inclusive ancestor of either boundary point's node is never
    /// contained: (ancestor, 0) can not be after a point inside it.
    pub fn contains_node(&self, node: NodeRef<'a>) -> bool {
        Node::have_same_root(node, self.start.node)
            && BoundaryPoint::new(node, 0).is_after(&self.start)
            && BoundaryPoint::new(node, node.length()).is_before(&self.end)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#partially-contained
    pub fn partially_contains_node(&self, node: NodeRef<'a>) -> bool {
        node.is_inclusive_ancestor_of(self.start.node) != node.is_inclusive_ancestor_of(self.end.node)
    }

    /// The children of `parent` that are contained in this range, in tree order.
    pub(super) fn contained_children(&self, parent: NodeRef<'a>) -> Vec<NodeRef<'a>> {
        parent
            .children()
            .iter()
            .copied()
            .filter(|&child| self.contains_node(child))
            .collect()
    }

    /// The first and last partially contained children of the common
    /// ancestor, each only when the boundary on its side is not itself an
    /// inclusive ancestor of the other boundary's node.
    pub(super) fn partially_contained_children(
        &self,
        common_ancestor: NodeRef<'a>,
    ) -> (Option<NodeRef<'a>>, Option<NodeRef<'a>>) {
        let children = common_ancestor.children().clone();

        let first = match self.start.node.is_inclusive_ancestor_of(self.end.node) {
            true => None,
            false => children
                .iter()
                .copied()
                .find(|&child| self.partially_contains_node(child)),
        };

        let last = match self.end.node.is_inclusive_ancestor_of(self.start.node) {
            true => None,
            false => children
                .iter()
                .rev()
                .copied()
                .find(|&child| self.partially_contains_node(child)),
        };

        (first, last)
    }

    /// Every contained node, in tree order, omitting any node whose parent is
    /// also contained.
    pub(super) fn topmost_contained_nodes(&self) -> Vec<NodeRef<'a>> {
        let mut nodes = Vec::new();
        self.common_ancestor_container()
            .for_each_in_inclusive_subtree(&mut |node| {
                if self.contains_node(node) {
                    nodes.push(node);
                    return false;
                }
                true
            });
        nodes
    }

    /// Where the range collapses once its contents are gone: the original
    /// start when the start node is an inclusive ancestor of the end node,
    /// otherwise right after the highest ancestor of the start node that is
    /// not an inclusive ancestor of the end node.
    pub(super) fn point_after_removal(&self) -> BoundaryPoint<'a> {
        if self.start.node.is_inclusive_ancestor_of(self.end.node) {
            return self.start;
        }

        let mut reference = self.start.node;
        while let Some(parent) = reference.parent() {
            if parent.is_inclusive_ancestor_of(self.end.node) {
                return BoundaryPoint::new(parent, reference.index() + 1);
            }
            reference = parent;
        }

        self.start
    }
}
