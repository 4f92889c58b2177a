use crate::arena::NodeRef;
use crate::dom_exception::DomException;
use crate::node::{Node, NodeData};

// 4.2.3. Mutation algorithms
// SPECLINK: https://dom.spec.whatwg.org/#mutation-algorithms
impl<'a> Node<'a> {
    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity
    pub fn ensure_pre_insertion_validity(
        &'a self,
        node: NodeRef<'a>,
        child: Option<NodeRef<'a>>,
    ) -> Result<(), DomException> {
        // SPEC: 1. If parent is not a Document, DocumentFragment, or Element node, then throw a "HierarchyRequestError" DOMException.
        if !self.is_document() && !self.is_document_fragment() && !self.is_element() {
            return Err(DomException::HierarchyRequestError);
        }

        // SPEC: 2. If node is a host-including inclusive ancestor of parent, then throw a "HierarchyRequestError" DOMException.
        if node.is_inclusive_ancestor_of(self) {
            return Err(DomException::HierarchyRequestError);
        }

        // SPEC: 3. If child is non-null and its parent is not parent, then throw a "NotFoundError" DOMException.
        if child.is_some_and(|child| !child.is_child_of(self)) {
            return Err(DomException::NotFoundError);
        }

        // SPEC: 4. If node is not a DocumentFragment, DocumentType, Element, or CharacterData node, then throw a "HierarchyRequestError" DOMException.
        if node.is_document() {
            return Err(DomException::HierarchyRequestError);
        }

        // SPEC: 5. If either node is a Text node and parent is a document,
        //          or node is a doctype and parent is not a document,
        //          then throw a "HierarchyRequestError" DOMException.
        if (node.is_text() && self.is_document()) || (node.is_doctype() && !self.is_document()) {
            return Err(DomException::HierarchyRequestError);
        }

        // SPEC: 6. If parent is a document, and any of the statements below,
        //          switched on the interface node implements, are true, then throw a "HierarchyRequestError" DOMException.
        if self.is_document()
            && match node.data {
                NodeData::DocumentFragment => {
                    let element_children = node
                        .children()
                        .iter()
                        .filter(|child| child.is_element())
                        .count();
                    // If node has more than one element child or has a Text node child.
                    element_children > 1
                        || node.children().iter().any(|child| child.is_text())
                        // Otherwise, if node has one element child and either parent has an element child,
                        // child is a doctype, or child is non-null and a doctype is following child.
                        || (element_children == 1
                            && (self.has_element_child()
                                || child.is_some_and(|c| c.is_doctype())
                                || child.is_some_and(|c| self.has_doctype_following(c))))
                }
                NodeData::Element { .. } => {
                    // parent has an element child,
                    self.has_element_child() ||
                        // child is a doctype,
                        child.is_some_and(|c| c.is_doctype()) ||
                        // or child is non-null and a doctype is following child.
                        child.is_some_and(|c| self.has_doctype_following(c))
                }
                NodeData::Doctype { .. } => {
                    // parent has a doctype child,
                    self.children().iter().any(|child| child.is_doctype()) ||
                        // child is non-null and an element is preceding child,
                        child.is_some_and(|c| self.has_element_preceding(c)) ||
                        // or child is null and parent has an element child.
                        child.is_none() && self.has_element_child()
                }
                _ => false,
            }
        {
            return Err(DomException::HierarchyRequestError);
        };

        Ok(())
    }

    fn has_element_child(&self) -> bool {
        self.children().iter().any(|child| child.is_element())
    }

    fn has_doctype_following(&self, child: NodeRef<'a>) -> bool {
        let index = child.index();
        self.children()
            .iter()
            .skip(index + 1)
            .any(|sibling| sibling.is_doctype())
    }

    fn has_element_preceding(&self, child: NodeRef<'a>) -> bool {
        let index = child.index();
        self.children()
            .iter()
            .take(index)
            .any(|sibling| sibling.is_element())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-pre-insert
    pub fn pre_insert(
        &'a self,
        node: NodeRef<'a>,
        child: Option<NodeRef<'a>>,
    ) -> Result<NodeRef<'a>, DomException> {
        // SPEC: 1. Ensure pre-insertion validity of node into parent before child.
        self.ensure_pre_insertion_validity(node, child)?;

        // SPEC: 2. Let referenceChild be child.
        let mut reference_child = child;

        // SPEC: 3. If referenceChild is node, then set referenceChild to node’s next sibling.
        if reference_child.is_some_and(|reference| Node::are_same(reference, node)) {
            reference_child = node.next_sibling();
        }

        // SPEC: 4. Insert node into parent before referenceChild.
        self.insert(node, reference_child);

        // SPEC: 5. Return node.
        Ok(node)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-insert
    pub fn insert(&'a self, node: NodeRef<'a>, child: Option<NodeRef<'a>>) {
        // SPEC: 1. Let nodes be node’s children, if node is a DocumentFragment node; otherwise « node ».
        let nodes = match node.is_document_fragment() {
            true => node.children().clone(),
            false => vec![node],
        };

        // SPEC: 2. Let count be nodes’s size.
        // SPEC: 3. If count is 0, then return.
        if nodes.is_empty() {
            return;
        }

        // SPEC: 4. If node is a DocumentFragment node, then remove its children.
        if node.is_document_fragment() {
            for child in nodes.iter() {
                child.remove();
            }
        }

        // SPEC: 7. For each node in nodes, in tree order:
        for &node in nodes.iter() {
            // SPEC: 7.1. Adopt node into parent’s node document.
            self.document().adopt(node);

            let mut children = self.children.borrow_mut();
            let index = child.and_then(|child| {
                children
                    .iter()
                    .position(|sibling| Node::are_same(sibling, child))
            });
            match index {
                // SPEC: 7.3. Otherwise, insert node into parent’s children before child’s index.
                Some(index) => children.insert(index, node),
                // SPEC: 7.2. If child is null, then append node to parent’s children.
                None => children.push(node),
            }
            node.parent.set(Some(self));
        }

        log::trace!("inserted {} node(s) into {}", nodes.len(), self.data);
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-append
    pub fn append_child(&'a self, node: NodeRef<'a>) -> Result<NodeRef<'a>, DomException> {
        self.pre_insert(node, None)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-adopt
    pub fn adopt(&'a self, node: NodeRef<'a>) {
        // SPEC: 1. Let oldDocument be node’s node document.
        let old_document = node.document();

        // SPEC: 2. If node’s parent is non-null, then remove node.
        if node.parent().is_some() {
            node.remove();
        }

        // SPEC: 3. If document is not oldDocument, then:
        if !Node::are_same(self, old_document) {
            // SPEC: 3.1. For each inclusiveDescendant in node’s shadow-including inclusive descendants:
            //      Set inclusiveDescendant’s node document to document.
            node.for_each_in_inclusive_subtree(&mut |inclusive_descendant| {
                inclusive_descendant.document.set(Some(self));
                true
            });
        }
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-pre-remove
    pub fn remove_child(&'a self, child: NodeRef<'a>) -> Result<NodeRef<'a>, DomException> {
        // SPEC: 1. If child’s parent is not parent, then throw a "NotFoundError" DOMException.
        if !child.is_child_of(self) {
            return Err(DomException::NotFoundError);
        }

        // SPEC: 2. Remove child.
        child.remove();

        // SPEC: 3. Return child.
        Ok(child)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-remove
    pub fn remove(&'a self) {
        // SPEC: 1. Let parent be node’s parent.
        // SPEC: 2. Assert: parent is non-null.
        let Some(parent) = self.parent() else {
            return;
        };

        // SPEC: 11. Remove node from its parent’s children.
        parent
            .children
            .borrow_mut()
            .retain(|child| !Node::are_same(child, self));
        self.parent.set(None);

        log::trace!("removed {} from {}", self.data, parent.data);
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-replace-all
    pub fn replace_all(&'a self, node: Option<NodeRef<'a>>) {
        // SPEC: 1. Let removedNodes be parent’s children.
        let removed_nodes = self.children().clone();

        // SPEC: 6. Remove all parent’s children, in tree order.
        for child in removed_nodes {
            child.remove();
        }

        // SPEC: 7. If node is non-null, then insert node into parent before null.
        if let Some(node) = node {
            self.insert(node, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::arena::NodeArena;
    use crate::dom_exception::DomException;
    use crate::node::Node;

    #[test]
    fn rejects_invalid_document_children() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let html = document.create_element("html");
        document.append_child(html).unwrap();

        let text = document.create_text_node("text");
        assert_eq!(
            document.append_child(text),
            Err(DomException::HierarchyRequestError)
        );

        let second = document.create_element("body");
        assert_eq!(
            document.append_child(second),
            Err(DomException::HierarchyRequestError)
        );

        // A doctype can not follow the document element.
        let doctype = document.create_document_type("html", "", "");
        assert_eq!(
            document.append_child(doctype),
            Err(DomException::HierarchyRequestError)
        );
        assert!(document.pre_insert(doctype, Some(html)).is_ok());
        assert_eq!(doctype.index(), 0);

        let div = document.create_element("div");
        assert_eq!(
            div.append_child(document.create_document_type("x", "", "")),
            Err(DomException::HierarchyRequestError)
        );
    }

    #[test]
    fn rejects_cycles_and_foreign_reference_children() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let outer = document.create_element("div");
        let inner = document.create_element("span");
        outer.append_child(inner).unwrap();

        assert_eq!(
            inner.append_child(outer),
            Err(DomException::HierarchyRequestError)
        );
        assert_eq!(
            outer.append_child(outer),
            Err(DomException::HierarchyRequestError)
        );

        let stranger = document.create_element("p");
        assert_eq!(
            outer.pre_insert(document.create_element("b"), Some(stranger)),
            Err(DomException::NotFoundError)
        );

        let text = document.create_text_node("leaf");
        assert_eq!(
            text.append_child(document.create_element("b")),
            Err(DomException::HierarchyRequestError)
        );
    }

    #[test]
    fn inserting_a_fragment_moves_its_children() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let list = document.create_element("ul");
        let last = document.create_element("li");
        list.append_child(last).unwrap();

        let fragment = document.create_document_fragment();
        let first = document.create_element("li");
        let second = document.create_element("li");
        fragment.append_child(first).unwrap();
        fragment.append_child(second).unwrap();

        list.pre_insert(fragment, Some(last)).unwrap();

        assert_eq!(fragment.length(), 0);
        assert_eq!(list.length(), 3);
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(last.index(), 2);
        assert!(Node::are_same_optional(second.parent(), Some(list)));
    }

    #[test]
    fn moving_a_node_detaches_it_first() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let parent = document.create_element("div");
        let a = document.create_element("a");
        let b = document.create_element("b");
        parent.append_child(a).unwrap();
        parent.append_child(b).unwrap();

        parent.append_child(a).unwrap();

        assert_eq!(parent.length(), 2);
        assert_eq!(b.index(), 0);
        assert_eq!(a.index(), 1);
    }

    #[test]
    fn remove_and_replace_all() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let parent = document.create_element("div");
        let a = document.create_element("a");
        let b = document.create_element("b");
        parent.append_child(a).unwrap();
        parent.append_child(b).unwrap();

        assert_eq!(document.remove_child(a), Err(DomException::NotFoundError));
        assert!(Node::are_same(parent.remove_child(a).unwrap(), a));
        assert!(a.parent().is_none());
        assert_eq!(parent.length(), 1);

        let c = document.create_element("c");
        parent.replace_all(Some(c));
        assert_eq!(parent.length(), 1);
        assert!(b.parent().is_none());
        assert!(Node::are_same_optional(parent.first_child(), Some(c)));

        parent.replace_all(None);
        assert!(!parent.has_child_nodes());
    }

    #[test]
    fn adopting_into_another_document_updates_descendants() {
        let arena = NodeArena::new();
        let first = Node::new_document(&arena);
        let second = Node::new_document(&arena);
        let div = first.create_element("div");
        let text = first.create_text_node("moved");
        div.append_child(text).unwrap();

        let body = second.create_element("body");
        second.append_child(body).unwrap();
        body.append_child(div).unwrap();

        assert!(Node::are_same(div.document(), second));
        assert!(Node::are_same(text.document(), second));
    }
}
