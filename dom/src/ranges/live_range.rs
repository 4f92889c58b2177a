use crate::mutation_record::MutationRecord;
use crate::node::Node;
use crate::ranges::{BoundaryPoint, Range};

impl<'a> BoundaryPoint<'a> {
    /// The point this boundary point moves to after the tree edit described
    /// by `record`.
    pub fn adjusted_for(&self, record: &MutationRecord<'a>) -> BoundaryPoint<'a> {
        let BoundaryPoint { node, offset } = *self;

        match *record {
            // SPECLINK: https://dom.spec.whatwg.org/#concept-node-insert
            MutationRecord::ChildInserted {
                parent,
                index,
                count,
            } => {
                // For each live range whose start node is parent and start offset is greater than child’s index, increase its start offset by count.
                if Node::are_same(node, parent) && offset > index {
                    return BoundaryPoint::new(node, offset + count);
                }
            }
            // SPECLINK: https://dom.spec.whatwg.org/#concept-node-remove
            MutationRecord::ChildRemoved {
                parent,
                index,
                node: removed,
            } => {
                // For each live range whose start node is an inclusive descendant of node, set its start to (parent, index).
                if removed.is_inclusive_ancestor_of(node) {
                    return BoundaryPoint::new(parent, index);
                }
                // For each live range whose start node is parent and start offset is greater than index, decrease its start offset by 1.
                if Node::are_same(node, parent) && offset > index {
                    return BoundaryPoint::new(node, offset - 1);
                }
            }
            // SPECLINK: https://dom.spec.whatwg.org/#concept-cd-replace
            MutationRecord::CharacterDataReplaced {
                node: target,
                offset: replaced_at,
                count,
                inserted,
            } => {
                if Node::are_same(node, target) && offset > replaced_at {
                    // For each live range whose start node is node and start offset is greater than offset but less than or equal to offset plus count, set its start offset to offset.
                    if offset <= replaced_at + count {
                        return BoundaryPoint::new(node, replaced_at);
                    }
                    // For each live range whose start node is node and start offset is greater than offset plus count,
                    // increase its start offset by data’s length and decrease it by count.
                    return BoundaryPoint::new(node, offset + inserted - count);
                }
            }
            // SPECLINK: https://dom.spec.whatwg.org/#concept-text-split
            MutationRecord::TextSplit {
                node: split,
                new_node,
                offset: split_at,
                parent,
                index,
            } => {
                // For each live range whose start node is node and start offset is greater than offset,
                // set its start node to new node and decrease its start offset by offset.
                if Node::are_same(node, split) && offset > split_at {
                    return BoundaryPoint::new(new_node, offset - split_at);
                }
                // For each live range whose start node is parent and start offset is greater than node’s index, increase its start offset by 1.
                if parent.is_some_and(|parent| Node::are_same(node, parent)) && offset > index {
                    return BoundaryPoint::new(node, offset + 1);
                }
            }
        }

        *self
    }
}

impl<'a> Range<'a> {
    /// Moves both boundary points to where they belong after the tree edit
    /// described by `record`.
    pub fn update_for_mutation(&mut self, record: &MutationRecord<'a>) {
        self.start = self.start.adjusted_for(record);
        self.end = self.end.adjusted_for(record);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::arena::NodeArena;
    use crate::mutation_record::MutationRecord;
    use crate::node::Node;
    use crate::ranges::{BoundaryPoint, Range};

    #[test]
    fn insertion_shifts_points_after_the_inserted_children() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let list = document.create_element("ul");
        for _ in 0..3 {
            list.append_child(document.create_element("li")).unwrap();
        }

        let mut range = Range::new(document);
        range.set_start(list, 1).unwrap();
        range.set_end(list, 2).unwrap();

        let record = MutationRecord::ChildInserted {
            parent: list,
            index: 1,
            count: 2,
        };
        range.update_for_mutation(&record);

        assert_eq!(range.start, BoundaryPoint::new(list, 1));
        assert_eq!(range.end, BoundaryPoint::new(list, 4));
    }

    #[test]
    fn removal_pulls_points_out_of_the_removed_subtree() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let body = document.create_element("body");
        let first = document.create_element("p");
        let text = document.create_text_node("gone");
        let second = document.create_element("p");
        body.append_child(first).unwrap();
        first.append_child(text).unwrap();
        body.append_child(second).unwrap();

        let mut range = Range::new(document);
        range.set_start(text, 2).unwrap();
        range.set_end(body, 2).unwrap();

        body.remove_child(first).unwrap();
        range.update_for_mutation(&MutationRecord::ChildRemoved {
            parent: body,
            index: 0,
            node: first,
        });

        assert_eq!(range.start, BoundaryPoint::new(body, 0));
        assert_eq!(range.end, BoundaryPoint::new(body, 1));
    }

    #[test]
    fn data_replacement_clamps_and_shifts_offsets() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let text = document.create_text_node("abcdefgh");

        let inside = BoundaryPoint::new(text, 3);
        let beyond = BoundaryPoint::new(text, 7);
        let before = BoundaryPoint::new(text, 1);
        let record = MutationRecord::CharacterDataReplaced {
            node: text,
            offset: 2,
            count: 3,
            inserted: 1,
        };

        assert_eq!(inside.adjusted_for(&record), BoundaryPoint::new(text, 2));
        assert_eq!(beyond.adjusted_for(&record), BoundaryPoint::new(text, 5));
        assert_eq!(before.adjusted_for(&record), before);
    }

    #[test]
    fn text_split_moves_points_into_the_new_node() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let p = document.create_element("p");
        let text = document.create_text_node("hello");
        p.append_child(text).unwrap();

        let tail = text.split_text(2).unwrap();
        let record = MutationRecord::TextSplit {
            node: text,
            new_node: tail,
            offset: 2,
            parent: Some(p),
            index: 0,
        };

        assert_eq!(
            BoundaryPoint::new(text, 4).adjusted_for(&record),
            BoundaryPoint::new(tail, 2)
        );
        assert_eq!(
            BoundaryPoint::new(text, 2).adjusted_for(&record),
            BoundaryPoint::new(text, 2)
        );
        assert_eq!(
            BoundaryPoint::new(p, 1).adjusted_for(&record),
            BoundaryPoint::new(p, 2)
        );
        assert_eq!(
            BoundaryPoint::new(p, 0).adjusted_for(&record),
            BoundaryPoint::new(p, 0)
        );
    }
}
