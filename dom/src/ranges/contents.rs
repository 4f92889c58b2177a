use crate::arena::NodeRef;
use crate::dom_exception::DomException;
use crate::mutation_record::MutationRecord;
use crate::node::Node;
use crate::ranges::{AbstractRange, BoundaryPoint, Range};

/// A clone of the character data node `node` holding only `count`
/// characters of its data starting at `offset`.
fn clone_character_data<'a>(
    node: NodeRef<'a>,
    offset: usize,
    count: usize,
) -> Result<NodeRef<'a>, DomException> {
    let clone = node.clone_node(false);
    let data = node.substring_data(offset, count)?;
    clone.replace_data(0, clone.length(), &data)?;
    Ok(clone)
}

impl<'a> Range<'a> {
    // SPECLINK: https://dom.spec.whatwg.org/#dom-range-deletecontents
    pub fn delete_contents(&mut self) -> Result<(), DomException> {
        // SPEC: 1. If this is collapsed, then return.
        if self.collapsed() {
            return Ok(());
        }

        // SPEC: 2. Let original start node, original start offset, original end node, and original end offset be this’s start node, start offset, end node, and end offset, respectively.
        let (original_start, original_end) = (self.start, self.end);
        log::trace!("deleting contents from {original_start} to {original_end}");

        // SPEC: 3. If original start node is original end node and it is a CharacterData node, then replace data with node original start node,
        //          offset original start offset, count original end offset minus original start offset, and data the empty string, and then return.
        if Node::are_same(original_start.node, original_end.node)
            && original_start.node.is_character_data()
        {
            let count = original_end.offset - original_start.offset;
            original_start
                .node
                .replace_data(original_start.offset, count, "")?;
            self.update_for_mutation(&MutationRecord::CharacterDataReplaced {
                node: original_start.node,
                offset: original_start.offset,
                count,
                inserted: 0,
            });
            return Ok(());
        }

        // SPEC: 4. Let nodes to remove be a list of all the nodes that are contained in this, in tree order, omitting any node whose parent is also contained in this.
        let nodes_to_remove = self.topmost_contained_nodes();

        // SPEC: 5-6. Let new node and new offset be where the range ends up once the nodes are removed.
        let new_point = self.point_after_removal();

        // SPEC: 7. If original start node is a CharacterData node, then replace data with node original start node, offset original start offset,
        //          count original start node’s length minus original start offset, data the empty string.
        if original_start.node.is_character_data() {
            let count = original_start.node.length() - original_start.offset;
            original_start
                .node
                .replace_data(original_start.offset, count, "")?;
        }

        // SPEC: 8. For each node in nodes to remove, in tree order, remove node.
        for node in nodes_to_remove {
            node.remove();
        }

        // SPEC: 9. If original end node is a CharacterData node, then replace data with node original end node, offset 0, count original end offset and data the empty string.
        if original_end.node.is_character_data() {
            original_end.node.replace_data(0, original_end.offset, "")?;
        }

        // SPEC: 10. Set start and end to (new node, new offset).
        self.start = new_point;
        self.end = new_point;

        Ok(())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-range-extract
    pub fn extract_contents(&mut self) -> Result<NodeRef<'a>, DomException> {
        // SPEC: 1. Let fragment be a new DocumentFragment node whose node document is range’s start node’s node document.
        let fragment = self.start.node.document().create_document_fragment();

        // SPEC: 2. If range is collapsed, then return fragment.
        if self.collapsed() {
            return Ok(fragment);
        }

        // SPEC: 3. Let original start node, original start offset, original end node, and original end offset be range’s start node, start offset, end node, and end offset, respectively.
        let (original_start, original_end) = (self.start, self.end);
        log::trace!("extracting contents from {original_start} to {original_end}");

        // SPEC: 4. If original start node is original end node and it is a CharacterData node, then:
        if Node::are_same(original_start.node, original_end.node)
            && original_start.node.is_character_data()
        {
            let count = original_end.offset - original_start.offset;

            // SPEC: 4.1-4.3. Let clone be a clone of original start node holding the covered substring, and append clone to fragment.
            let clone = clone_character_data(original_start.node, original_start.offset, count)?;
            fragment.append_child(clone)?;

            // SPEC: 4.4. Replace data with node original start node, offset original start offset, count original end offset minus original start offset, and data the empty string.
            original_start
                .node
                .replace_data(original_start.offset, count, "")?;
            self.update_for_mutation(&MutationRecord::CharacterDataReplaced {
                node: original_start.node,
                offset: original_start.offset,
                count,
                inserted: 0,
            });

            // SPEC: 4.5. Return fragment.
            return Ok(fragment);
        }

        // SPEC: 5. Let common ancestor be original start node.
        // SPEC: 6. While common ancestor is not an inclusive ancestor of original end node, set common ancestor to its own parent.
        let common_ancestor = self.common_ancestor_container();

        // SPEC: 7-10. Find the first and last partially contained children of common ancestor.
        let (first_partially_contained_child, last_partially_contained_child) =
            self.partially_contained_children(common_ancestor);

        // SPEC: 11. Let contained children be a list of all children of common ancestor that are contained in range, in tree order.
        let contained_children = self.contained_children(common_ancestor);

        // SPEC: 12. If any member of contained children is a doctype, then throw a "HierarchyRequestError" DOMException.
        if contained_children.iter().any(|child| child.is_doctype()) {
            return Err(DomException::HierarchyRequestError);
        }

        // SPEC: 13-14. Let new node and new offset be where the range ends up once the contents are extracted.
        let new_point = self.point_after_removal();

        // SPEC: 15. If first partially contained child is a CharacterData node, then:
        if let Some(child) = first_partially_contained_child {
            if child.is_character_data() {
                // SPEC: 15.1-15.3. Let clone be a clone of original start node holding the data after original start offset, and append clone to fragment.
                let count = original_start.node.length() - original_start.offset;
                let clone = clone_character_data(original_start.node, original_start.offset, count)?;
                fragment.append_child(clone)?;

                // SPEC: 15.4. Replace data with node original start node, offset original start offset, count original start node’s length minus original start offset, and data the empty string.
                original_start
                    .node
                    .replace_data(original_start.offset, count, "")?;
            } else {
                // SPEC: 16. Otherwise, if first partially contained child is not null:
                // SPEC: 16.1-16.2. Let clone be a clone of first partially contained child and append clone to fragment.
                let clone = child.clone_node(false);
                fragment.append_child(clone)?;

                // SPEC: 16.3. Let subrange be a new live range whose start is (original start node, original start offset) and whose end is (first partially contained child, first partially contained child’s length).
                let mut subrange = Range {
                    start: original_start,
                    end: BoundaryPoint::new(child, child.length()),
                };

                // SPEC: 16.4-16.5. Let subfragment be the result of extracting subrange and append subfragment to clone.
                let subfragment = subrange.extract_contents()?;
                clone.append_child(subfragment)?;
            }
        }

        // SPEC: 17. For each contained child in contained children, append contained child to fragment.
        for child in contained_children {
            fragment.append_child(child)?;
        }

        // SPEC: 18. If last partially contained child is a CharacterData node, then:
        if let Some(child) = last_partially_contained_child {
            if child.is_character_data() {
                // SPEC: 18.1-18.3. Let clone be a clone of original end node holding the data before original end offset, and append clone to fragment.
                let clone = clone_character_data(original_end.node, 0, original_end.offset)?;
                fragment.append_child(clone)?;

                // SPEC: 18.4. Replace data with node original end node, offset 0, count original end offset, and data the empty string.
                original_end.node.replace_data(0, original_end.offset, "")?;
            } else {
                // SPEC: 19. Otherwise, if last partially contained child is not null:
                let clone = child.clone_node(false);
                fragment.append_child(clone)?;

                // SPEC: 19.3. Let subrange be a new live range whose start is (last partially contained child, 0) and whose end is (original end node, original end offset).
                let mut subrange = Range {
                    start: BoundaryPoint::new(child, 0),
                    end: original_end,
                };

                let subfragment = subrange.extract_contents()?;
                clone.append_child(subfragment)?;
            }
        }

        // SPEC: 20. Set range’s start and end to (new node, new offset).
        self.start = new_point;
        self.end = new_point;

        // SPEC: 21. Return fragment.
        Ok(fragment)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-range-clone
    pub fn clone_contents(&self) -> Result<NodeRef<'a>, DomException> {
        // SPEC: 1. Let fragment be a new DocumentFragment node whose node document is range’s start node’s node document.
        let fragment = self.start.node.document().create_document_fragment();

        // SPEC: 2. If range is collapsed, then return fragment.
        if self.collapsed() {
            return Ok(fragment);
        }

        // SPEC: 3. Let original start node, original start offset, original end node, and original end offset be range’s start node, start offset, end node, and end offset, respectively.
        let (original_start, original_end) = (self.start, self.end);

        // SPEC: 4. If original start node is original end node and it is a CharacterData node, then:
        if Node::are_same(original_start.node, original_end.node)
            && original_start.node.is_character_data()
        {
            let count = original_end.offset - original_start.offset;
            let clone = clone_character_data(original_start.node, original_start.offset, count)?;
            fragment.append_child(clone)?;
            return Ok(fragment);
        }

        // SPEC: 5-6. Let common ancestor be the lowest inclusive ancestor of both original start node and original end node.
        let common_ancestor = self.common_ancestor_container();

        // SPEC: 7-10.
        let (first_partially_contained_child, last_partially_contained_child) =
            self.partially_contained_children(common_ancestor);

        // SPEC: 11. Let contained children be a list of all children of common ancestor that are contained in range, in tree order.
        let contained_children = self.contained_children(common_ancestor);

        // SPEC: 12. If any member of contained children is a doctype, then throw a "HierarchyRequestError" DOMException.
        if contained_children.iter().any(|child| child.is_doctype()) {
            return Err(DomException::HierarchyRequestError);
        }

        // SPEC: 13. If first partially contained child is a CharacterData node, then:
        if let Some(child) = first_partially_contained_child {
            if child.is_character_data() {
                let count = original_start.node.length() - original_start.offset;
                let clone = clone_character_data(original_start.node, original_start.offset, count)?;
                fragment.append_child(clone)?;
            } else {
                // SPEC: 14. Otherwise, if first partially contained child is not null:
                let clone = child.clone_node(false);
                fragment.append_child(clone)?;

                let subrange = Range {
                    start: original_start,
                    end: BoundaryPoint::new(child, child.length()),
                };
                let subfragment = subrange.clone_contents()?;
                clone.append_child(subfragment)?;
            }
        }

        // SPEC: 15. For each contained child in contained children:
        for child in contained_children {
            // SPEC: 15.1. Let clone be a clone of contained child with the clone children flag set.
            // SPEC: 15.2. Append clone to fragment.
            fragment.append_child(child.clone_node(true))?;
        }

        // SPEC: 16. If last partially contained child is a CharacterData node, then:
        if let Some(child) = last_partially_contained_child {
            if child.is_character_data() {
                let clone = clone_character_data(original_end.node, 0, original_end.offset)?;
                fragment.append_child(clone)?;
            } else {
                // SPEC: 17. Otherwise, if last partially contained child is not null:
                let clone = child.clone_node(false);
                fragment.append_child(clone)?;

                let subrange = Range {
                    start: BoundaryPoint::new(child, 0),
                    end: original_end,
                };
                let subfragment = subrange.clone_contents()?;
                clone.append_child(subfragment)?;
            }
        }

        // SPEC: 18. Return fragment.
        Ok(fragment)
    }
}
