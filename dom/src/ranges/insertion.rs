use crate::arena::NodeRef;
use crate::dom_exception::DomException;
use crate::mutation_record::MutationRecord;
use crate::node::Node;
use crate::ranges::{AbstractRange, BoundaryPoint, Range};

/// The parent and reference child a node inserted at `point` would get.
fn insertion_target<'a>(
    point: BoundaryPoint<'a>,
    node: NodeRef<'a>,
) -> Result<(NodeRef<'a>, Option<NodeRef<'a>>), DomException> {
    let container = point.node;

    // SPEC: 1. If range’s start node is a ProcessingInstruction or Comment node, is a Text node whose parent is null, or is node,
    //          then throw a "HierarchyRequestError" DOMException.
    if container.is_processing_instruction()
        || container.is_comment()
        || (container.is_text() && container.parent().is_none())
        || Node::are_same(container, node)
    {
        return Err(DomException::HierarchyRequestError);
    }

    // SPEC: 2. Let referenceNode be null.
    // SPEC: 3. If range’s start node is a Text node, set referenceNode to that Text node.
    // SPEC: 4. Otherwise, set referenceNode to the child of start node whose index is start offset, and null if there is no such child.
    let reference = match container.is_text() {
        true => Some(container),
        false => container.child(point.offset),
    };

    // SPEC: 5. Let parent be range’s start node if referenceNode is null, and referenceNode’s parent otherwise.
    let parent = match reference {
        Some(reference) => reference.parent().unwrap_or(container),
        None => container,
    };

    Ok((parent, reference))
}

impl<'a> Range<'a> {
    // SPECLINK: https://dom.spec.whatwg.org/#concept-range-insert
    pub fn insert_node(&mut self, node: NodeRef<'a>) -> Result<(), DomException> {
        let was_collapsed = self.collapsed();
        let (parent, mut reference) = insertion_target(self.start, node)?;

        // SPEC: 6. Ensure pre-insertion validity of node into parent before referenceNode.
        parent.ensure_pre_insertion_validity(node, reference)?;

        // SPEC: 7. If range’s start node is a Text node, set referenceNode to the result of splitting it with offset range’s start offset.
        let start = self.start;
        if start.node.is_text() {
            let index = start.node.index();
            let new_node = start.node.split_text(start.offset)?;
            self.update_for_mutation(&MutationRecord::TextSplit {
                node: start.node,
                new_node,
                offset: start.offset,
                parent: Some(parent),
                index,
            });
            reference = Some(new_node);
        }

        // SPEC: 8. If node is referenceNode, then set referenceNode to its next sibling.
        if reference.is_some_and(|reference| Node::are_same(reference, node)) {
            reference = node.next_sibling();
        }

        // SPEC: 9. If node’s parent is non-null, then remove node.
        if let Some(old_parent) = node.parent() {
            let index = node.index();
            node.remove();
            self.update_for_mutation(&MutationRecord::ChildRemoved {
                parent: old_parent,
                index,
                node,
            });
        }

        // SPEC: 10. Let newOffset be parent’s length if referenceNode is null; otherwise referenceNode’s index.
        let index = match reference {
            Some(reference) => reference.index(),
            None => parent.length(),
        };

        // SPEC: 11. Increase newOffset by node’s length if node is a DocumentFragment node; otherwise 1.
        let count = match node.is_document_fragment() {
            true => node.length(),
            false => 1,
        };
        let new_offset = index + count;

        log::trace!("inserting {node} into {parent} at offset {index}");

        // SPEC: 12. Pre-insert node into parent before referenceNode.
        parent.pre_insert(node, reference)?;
        self.update_for_mutation(&MutationRecord::ChildInserted {
            parent,
            index,
            count,
        });

        // SPEC: 13. If range was collapsed, then set range’s end to (parent, newOffset).
        if was_collapsed {
            self.end = BoundaryPoint::new(parent, new_offset);
        }

        Ok(())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-surroundcontents
    /// Moves the contents of this range into `new_parent` and puts
    /// `new_parent` where the contents were.
    ///
    /// Every error is reported before the tree is touched.
    pub fn surround_contents(&mut self, new_parent: NodeRef<'a>) -> Result<(), DomException> {
        // SPEC: 1. If a non-Text node is partially contained in this, then throw an "InvalidStateError" DOMException.
        let start_ancestors = self.start.node.inclusive_ancestors();
        let end_ancestors = self.end.node.inclusive_ancestors();
        if start_ancestors
            .iter()
            .chain(end_ancestors.iter())
            .any(|&node| !node.is_text() && self.partially_contains_node(node))
        {
            return Err(DomException::InvalidStateError);
        }

        // SPEC: 2. If newParent is a Document, DocumentType, or DocumentFragment node, then throw an "InvalidNodeTypeError" DOMException.
        if new_parent.is_document() || new_parent.is_doctype() || new_parent.is_document_fragment() {
            return Err(DomException::InvalidNodeTypeError);
        }

        // Appending the extracted contents to character data always fails.
        if new_parent.is_character_data() {
            return Err(DomException::HierarchyRequestError);
        }

        // The range collapses here once its contents are extracted, which is where newParent goes.
        let collapse_point = self.point_after_removal();
        let (parent, _) = insertion_target(collapse_point, new_parent)?;
        if new_parent.is_inclusive_ancestor_of(parent) {
            return Err(DomException::HierarchyRequestError);
        }
        if parent.is_document()
            && !self.document_accepts_after_extraction(parent, collapse_point.offset, new_parent)
        {
            return Err(DomException::HierarchyRequestError);
        }

        // SPEC: 3. Let fragment be the result of extracting this.
        let fragment = self.extract_contents()?;

        // SPEC: 4. If newParent has children, then replace all with null within newParent.
        if new_parent.has_child_nodes() {
            new_parent.replace_all(None);
        }

        // SPEC: 5. Insert newParent into this.
        self.insert_node(new_parent)?;

        // SPEC: 6. Append fragment to newParent.
        new_parent.append_child(fragment)?;

        // SPEC: 7. Select newParent within this.
        self.select_node(new_parent)
    }

    /// Whether the element `new_parent` can go into `document` at `offset`
    /// once the children contained in this range have been extracted.
    fn document_accepts_after_extraction(
        &self,
        document: NodeRef<'a>,
        offset: usize,
        new_parent: NodeRef<'a>,
    ) -> bool {
        // Contained children all follow the collapse point, so `offset` still
        // addresses the same position among the remaining children.
        let remaining: Vec<NodeRef<'a>> = document
            .children()
            .iter()
            .copied()
            .filter(|&child| !self.contains_node(child))
            .collect();

        // The document must not keep an element child other than newParent,
        let has_other_element = remaining
            .iter()
            .any(|&child| child.is_element() && !Node::are_same(child, new_parent));

        // and no doctype may be at or after the insertion point.
        let doctype_follows = remaining
            .iter()
            .skip(offset)
            .any(|child| child.is_doctype());

        !has_other_element && !doctype_follows
    }
}
