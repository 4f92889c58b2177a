use crate::arena::NodeRef;
use crate::dom_exception::DomException;
use crate::node::Node;
use crate::ranges::{AbstractRange, BoundaryPoint};

// SPECLINK: https://dom.spec.whatwg.org/#interface-staticrange
/// A range whose boundary points are not updated when the tree changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRange<'arena> {
    start: BoundaryPoint<'arena>,
    end: BoundaryPoint<'arena>,
}

impl<'arena> AbstractRange<'arena> for StaticRange<'arena> {
    fn start(&self) -> &BoundaryPoint<'arena> {
        &self.start
    }

    fn end(&self) -> &BoundaryPoint<'arena> {
        &self.end
    }
}

impl<'arena> StaticRange<'arena> {
    pub fn new(
        start_container: NodeRef<'arena>,
        start_offset: usize,
        end_container: NodeRef<'arena>,
        end_offset: usize,
    ) -> Result<Self, DomException> {
        // SPEC: 1. If init["startContainer"] or init["endContainer"] is a DocumentType or Attr node,
        //          then throw an "InvalidNodeTypeError" DOMException.
        if start_container.is_doctype() || end_container.is_doctype() {
            return Err(DomException::InvalidNodeTypeError);
        }

        // SPEC: 2. Set this’s start to (init["startContainer"], init["startOffset"])
        //          and end to (init["endContainer"], init["endOffset"]).
        Ok(StaticRange {
            start: BoundaryPoint::new(start_container, start_offset),
            end: BoundaryPoint::new(end_container, end_offset),
        })
    }

    pub fn is_valid(&self) -> bool {
        // A StaticRange is valid if all of the following are true:
        // * Its start and end are in the same node tree.
        Node::have_same_root(self.start.node, self.end.node) &&
            // * Its start offset is between 0 and its start node’s length, inclusive.
            self.start.verify_correctness() &&
            // * Its end offset is between 0 and its end node’s length, inclusive.
            self.end.verify_correctness() &&
            // * Its start is before or equal to its end.
            !self.start.is_after(&self.end)
    }
}
