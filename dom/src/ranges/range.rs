use std::fmt;

use crate::arena::NodeRef;
use crate::dom_exception::DomException;
use crate::node::Node;
use crate::ranges::{AbstractRange, BoundaryPoint, BoundaryPointPosition};

// SPECLINK: https://dom.spec.whatwg.org/#interface-range
/// A live range: a pair of boundary points in the same node tree, with the
/// start never after the end.
///
/// A range only borrows the nodes it points at. Its own operations keep its
/// boundary points valid; edits made to the tree through other paths can be
/// reported with [`Range::update_for_mutation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<'a> {
    pub(super) start: BoundaryPoint<'a>,
    pub(super) end: BoundaryPoint<'a>,
}

impl<'a> AbstractRange<'a> for Range<'a> {
    fn start(&self) -> &BoundaryPoint<'a> {
        &self.start
    }

    fn end(&self) -> &BoundaryPoint<'a> {
        &self.end
    }
}

/// Selects which boundary points [`Range::compare_boundary_points`] compares.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum How {
    StartToStart = 0,
    StartToEnd = 1,
    EndToEnd = 2,
    EndToStart = 3,
}

impl TryFrom<u16> for How {
    type Error = DomException;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(How::StartToStart),
            1 => Ok(How::StartToEnd),
            2 => Ok(How::EndToEnd),
            3 => Ok(How::EndToStart),
            _ => Err(DomException::NotSupportedError),
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    Start,
    End,
}

impl<'a> Range<'a> {
    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-range
    pub fn new(document: NodeRef<'a>) -> Self {
        // The new Range() constructor steps are to set this’s start and end to (current global object’s associated Document, 0).
        Self {
            start: BoundaryPoint::new(document, 0),
            end: BoundaryPoint::new(document, 0),
        }
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-range-root
    pub fn root(&self) -> NodeRef<'a> {
        self.start.node.root()
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-commonancestorcontainer
    pub fn common_ancestor_container(&self) -> NodeRef<'a> {
        // SPEC: 1. Let container be start node.
        // SPEC: 2. While container is not an inclusive ancestor of end node, let container be container’s parent.
        // SPEC: 3. Return container.
        Node::common_ancestor(self.start.node, self.end.node).unwrap_or_else(|| self.root())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-range-bp-set
    fn set_boundary(
        &mut self,
        side: Side,
        node: NodeRef<'a>,
        offset: usize,
    ) -> Result<(), DomException> {
        // SPEC: 1. If node is a doctype, then throw an "InvalidNodeTypeError" DOMException.
        if node.is_doctype() {
            log::debug!("rejected {node} as a boundary point container");
            return Err(DomException::InvalidNodeTypeError);
        }

        // SPEC: 2. If offset is greater than node’s length, then throw an "IndexSizeError" DOMException.
        if offset > node.length() {
            log::debug!("rejected offset {offset} in {node} of length {}", node.length());
            return Err(DomException::IndexSizeError);
        }

        // SPEC: 3. Let bp be the boundary point (node, offset).
        let bp = BoundaryPoint::new(node, offset);
        let other_root = !Node::are_same(self.root(), node.root());

        match side {
            Side::Start => {
                // SPEC: 4.1. If range’s root is not equal to node’s root, or if bp is after the range’s end, set range’s end to bp.
                if other_root || bp.is_after(&self.end) {
                    self.end = bp;
                }
                // SPEC: 4.2. Set range’s start to bp.
                self.start = bp;
            }
            Side::End => {
                // SPEC: 5.1. If range’s root is not equal to node’s root, or if bp is before the range’s start, set range’s start to bp.
                if other_root || bp.is_before(&self.start) {
                    self.start = bp;
                }
                // SPEC: 5.2. Set range’s end to bp.
                self.end = bp;
            }
        }

        Ok(())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-setstart
    pub fn set_start(&mut self, node: NodeRef<'a>, offset: usize) -> Result<(), DomException> {
        self.set_boundary(Side::Start, node, offset)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-setend
    pub fn set_end(&mut self, node: NodeRef<'a>, offset: usize) -> Result<(), DomException> {
        self.set_boundary(Side::End, node, offset)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-setstartbefore
    pub fn set_start_before(&mut self, node: NodeRef<'a>) -> Result<(), DomException> {
        // SPEC: 1. Let parent be node’s parent.
        // SPEC: 2. If parent is null, then throw an "InvalidNodeTypeError" DOMException.
        let parent = node.parent().ok_or(DomException::InvalidNodeTypeError)?;
        // SPEC: 3. Set the start of this to boundary point (parent, node’s index).
        self.set_start(parent, node.index())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-setstartafter
    pub fn set_start_after(&mut self, node: NodeRef<'a>) -> Result<(), DomException> {
        let parent = node.parent().ok_or(DomException::InvalidNodeTypeError)?;
        self.set_start(parent, node.index() + 1)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-setendbefore
    pub fn set_end_before(&mut self, node: NodeRef<'a>) -> Result<(), DomException> {
        let parent = node.parent().ok_or(DomException::InvalidNodeTypeError)?;
        self.set_end(parent, node.index())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-setendafter
    pub fn set_end_after(&mut self, node: NodeRef<'a>) -> Result<(), DomException> {
        let parent = node.parent().ok_or(DomException::InvalidNodeTypeError)?;
        self.set_end(parent, node.index() + 1)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-collapse
    pub fn collapse(&mut self, to_start: bool) {
        // The collapse(toStart) method steps are to, if toStart is true, set end to start; otherwise set start to end.
        match to_start {
            true => self.end = self.start,
            false => self.start = self.end,
        }
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-range-select
    pub fn select_node(&mut self, node: NodeRef<'a>) -> Result<(), DomException> {
        // SPEC: 1. Let parent be node’s parent.
        // SPEC: 2. If parent is null, then throw an "InvalidNodeTypeError" DOMException.
        let parent = node.parent().ok_or(DomException::InvalidNodeTypeError)?;

        // SPEC: 3. Let index be node’s index.
        let index = node.index();

        // SPEC: 4. Set range’s start to boundary point (parent, index).
        self.start = BoundaryPoint::new(parent, index);

        // SPEC: 5. Set range’s end to boundary point (parent, index plus 1).
        self.end = BoundaryPoint::new(parent, index + 1);

        Ok(())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-selectnodecontents
    pub fn select_node_contents(&mut self, node: NodeRef<'a>) -> Result<(), DomException> {
        // SPEC: 1. If node is a doctype, throw an "InvalidNodeTypeError" DOMException.
        if node.is_doctype() {
            return Err(DomException::InvalidNodeTypeError);
        }

        // SPEC: 2. Let length be the length of node.
        let length = node.length();

        // SPEC: 3. Set start to the boundary point (node, 0).
        self.start = BoundaryPoint::new(node, 0);

        // SPEC: 4. Set end to the boundary point (node, length).
        self.end = BoundaryPoint::new(node, length);

        Ok(())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-compareboundarypoints
    pub fn compare_boundary_points(
        &self,
        how: How,
        source_range: &Range<'a>,
    ) -> Result<BoundaryPointPosition, DomException> {
        // SPEC: 2. If this’s root is not the same as sourceRange’s root, then throw a "WrongDocumentError" DOMException.
        if !Node::are_same(self.root(), source_range.root()) {
            return Err(DomException::WrongDocumentError);
        }

        // SPEC: 3. Let this point and other point be the following:
        let (this_point, other_point) = match how {
            How::StartToStart => (&self.start, &source_range.start),
            How::StartToEnd => (&self.end, &source_range.start),
            How::EndToEnd => (&self.end, &source_range.end),
            How::EndToStart => (&self.start, &source_range.end),
        };

        // SPEC: 4. Switch on the position of this point relative to other point.
        Ok(this_point.position(other_point))
    }

    fn validate_point(&self, node: NodeRef<'a>, offset: usize) -> Result<(), DomException> {
        // If node is a doctype, then throw an "InvalidNodeTypeError" DOMException.
        if node.is_doctype() {
            return Err(DomException::InvalidNodeTypeError);
        }

        // If offset is greater than node’s length, then throw an "IndexSizeError" DOMException.
        if offset > node.length() {
            return Err(DomException::IndexSizeError);
        }

        Ok(())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-ispointinrange
    pub fn is_point_in_range(&self, node: NodeRef<'a>, offset: usize) -> Result<bool, DomException> {
        // SPEC: 1. If node’s root is different from this’s root, return false.
        if !Node::are_same(node.root(), self.root()) {
            return Ok(false);
        }

        // SPEC: 2-3.
        self.validate_point(node, offset)?;

        // SPEC: 4. If (node, offset) is before start or after end, return false.
        // SPEC: 5. Return true.
        let point = BoundaryPoint::new(node, offset);
        Ok(!point.is_before(&self.start) && !point.is_after(&self.end))
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-comparepoint
    pub fn compare_point(
        &self,
        node: NodeRef<'a>,
        offset: usize,
    ) -> Result<BoundaryPointPosition, DomException> {
        // SPEC: 1. If node’s root is different from this’s root, then throw a "WrongDocumentError" DOMException.
        if !Node::are_same(node.root(), self.root()) {
            return Err(DomException::WrongDocumentError);
        }

        // SPEC: 2-3.
        self.validate_point(node, offset)?;

        let point = BoundaryPoint::new(node, offset);

        // SPEC: 4. If (node, offset) is before start, return −1.
        if point.is_before(&self.start) {
            return Ok(BoundaryPointPosition::Before);
        }

        // SPEC: 5. If (node, offset) is after end, return 1.
        if point.is_after(&self.end) {
            return Ok(BoundaryPointPosition::After);
        }

        // SPEC: 6. Return 0.
        Ok(BoundaryPointPosition::Equal)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-intersectsnode
    pub fn intersects_node(&self, node: NodeRef<'a>) -> bool {
        // SPEC: 1. If node’s root is different from this’s root, return false.
        if !Node::are_same(node.root(), self.root()) {
            return false;
        }

        // SPEC: 2. Let parent be node’s parent.
        // SPEC: 3. If parent is null, return true.
        let Some(parent) = node.parent() else {
            return true;
        };

        // SPEC: 4. Let offset be node’s index.
        let offset = node.index();

        // SPEC: 5. If (parent, offset) is before end and (parent, offset plus 1) is after start, return true.
        // SPEC: 6. Return false.
        BoundaryPoint::new(parent, offset).is_before(&self.end)
            && BoundaryPoint::new(parent, offset + 1).is_after(&self.start)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-clonerange
    pub fn clone_range(&self) -> Range<'a> {
        Range {
            start: self.start,
            end: self.end,
        }
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-detach
    pub fn detach(&self) {
        // The detach() method steps are to do nothing.
    }
}

// SPECLINK: https://dom.spec.whatwg.org/#dom-range-stringifier
impl fmt::Display for Range<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = (self.start, self.end);

        // SPEC: 2. If this’s start node is this’s end node and it is a Text node,
        //          then return the substring of that Text node’s data beginning at this’s start offset and ending at this’s end offset.
        if Node::are_same(start.node, end.node) && start.node.is_text() {
            let data = start
                .node
                .substring_data(start.offset, end.offset.saturating_sub(start.offset))
                .map_err(|_| fmt::Error)?;
            return f.write_str(&data);
        }

        // SPEC: 1. Let s be the empty string.
        let mut s = String::new();

        // SPEC: 3. If this’s start node is a Text node, then append the substring of that node’s data from this’s start offset until the end to s.
        if start.node.is_text() {
            let count = start.node.length().saturating_sub(start.offset);
            s.push_str(&start.node.substring_data(start.offset, count).map_err(|_| fmt::Error)?);
        }

        // SPEC: 4. Append the concatenation of the data of all Text nodes that are contained in this, in tree order, to s.
        self.common_ancestor_container()
            .for_each_in_inclusive_subtree(&mut |node| {
                if node.is_text() && self.contains_node(node) {
                    s.push_str(&node.data().unwrap_or_default());
                }
                true
            });

        // SPEC: 5. If this’s end node is a Text node, then append the substring of that node’s data from its start until this’s end offset to s.
        if end.node.is_text() {
            s.push_str(&end.node.substring_data(0, end.offset).map_err(|_| fmt::Error)?);
        }

        // SPEC: 6. Return s.
        f.write_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{How, Range};
    use crate::arena::NodeArena;
    use crate::dom_exception::DomException;
    use crate::node::Node;
    use crate::ranges::AbstractRange;

    #[rstest]
    #[case(0, Ok(How::StartToStart))]
    #[case(1, Ok(How::StartToEnd))]
    #[case(2, Ok(How::EndToEnd))]
    #[case(3, Ok(How::EndToStart))]
    #[case(4, Err(DomException::NotSupportedError))]
    #[case(u16::MAX, Err(DomException::NotSupportedError))]
    fn how_from_numeric_value(#[case] value: u16, #[case] expected: Result<How, DomException>) {
        assert_eq!(How::try_from(value), expected);
    }

    #[test]
    fn new_range_is_collapsed_at_the_document() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);

        let range = Range::new(document);

        assert!(range.collapsed());
        assert!(Node::are_same(range.start_container(), document));
        assert_eq!(range.start_offset(), 0);
        assert!(Node::are_same(range.common_ancestor_container(), document));
        assert!(Node::are_same(range.root(), document));
    }

    #[test]
    fn setting_a_boundary_in_another_tree_collapses_the_range() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let html = document.create_element("html");
        document.append_child(html).unwrap();
        let detached = document.create_element("div");
        detached.append_child(document.create_text_node("x")).unwrap();

        let mut range = Range::new(document);
        range.set_end(html, 0).unwrap();
        range.set_start(detached, 1).unwrap();

        assert!(range.collapsed());
        assert!(Node::are_same(range.end_container(), detached));
        assert!(Node::are_same(range.root(), detached));
    }
}
