use std::cell::{Cell, RefCell};
use std::fmt;

use crate::arena::{Arena, NodeLink, NodeRef};
use crate::dom_exception::DomException;
use crate::{Attribute, Namespace, QualifiedName};

/// A node in a document tree.
///
/// Nodes are allocated in an arena and handed out as `&'a Node<'a>`, so
/// identity is pointer identity. The tree links use interior mutability,
/// which lets ranges and mutation algorithms work with shared references.
pub struct Node<'a> {
    pub(crate) arena: Arena<'a>,
    pub(crate) document: NodeLink<'a>,
    pub(crate) parent: NodeLink<'a>,
    pub(crate) children: RefCell<Vec<NodeRef<'a>>>,
    pub data: NodeData,
}

impl<'a> Node<'a> {
    pub(crate) fn new(arena: Arena<'a>, document: Option<NodeRef<'a>>, data: NodeData) -> Node<'a> {
        Node {
            arena,
            document: Cell::new(document),
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
            data,
        }
    }

    pub fn are_same(a: &Node<'a>, b: &Node<'a>) -> bool {
        std::ptr::eq(a, b)
    }

    pub fn are_same_optional(a: Option<NodeRef<'a>>, b: Option<NodeRef<'a>>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => Node::are_same(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-tree-root
    pub fn root(&'a self) -> NodeRef<'a> {
        // The root of an object is itself, if its parent is null, or else it is the root of its parent.
        let mut root = self;
        while let Some(parent) = root.parent() {
            root = parent;
        }
        root
    }

    pub fn have_same_root(a: NodeRef<'a>, b: NodeRef<'a>) -> bool {
        Node::are_same(a.root(), b.root())
    }

    /// The node document. A document is its own node document.
    pub fn document(&'a self) -> NodeRef<'a> {
        match self.document.get() {
            Some(document) => document,
            None => self,
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.parent.get()
    }

    pub fn children(&self) -> std::cell::Ref<'_, Vec<NodeRef<'a>>> {
        self.children.borrow()
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        self.children.borrow().get(index).copied()
    }

    pub fn has_child_nodes(&self) -> bool {
        !self.children.borrow().is_empty()
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.children.borrow().first().copied()
    }

    pub fn last_child(&self) -> Option<NodeRef<'a>> {
        self.children.borrow().last().copied()
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        let parent = self.parent()?;
        let index = self.index().checked_sub(1)?;
        parent.child(index)
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.parent()?.child(self.index() + 1)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-tree-index
    pub fn index(&self) -> usize {
        match self.parent() {
            Some(parent) => parent
                .children()
                .iter()
                .position(|child| Node::are_same(child, self))
                .unwrap_or(0),
            None => 0,
        }
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-tree-inclusive-ancestor
    pub fn inclusive_ancestors(&'a self) -> Vec<NodeRef<'a>> {
        let mut nodes = vec![self];
        let mut current = self.parent();
        while let Some(ancestor) = current {
            nodes.push(ancestor);
            current = ancestor.parent();
        }
        nodes
    }

    pub fn is_inclusive_ancestor_of(&self, other: NodeRef<'a>) -> bool {
        let mut current = Some(other);
        while let Some(node) = current {
            if Node::are_same(node, self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    pub fn is_ancestor_of(&self, other: NodeRef<'a>) -> bool {
        !Node::are_same(self, other) && self.is_inclusive_ancestor_of(other)
    }

    pub fn is_child_of(&self, other: NodeRef<'a>) -> bool {
        self.parent()
            .is_some_and(|parent| Node::are_same(parent, other))
    }

    /// Returns the child of `self` that is an inclusive ancestor of
    /// `descendant`, or `None` when `self` is not an ancestor of it.
    pub fn child_towards(&self, descendant: NodeRef<'a>) -> Option<NodeRef<'a>> {
        let mut current = descendant;
        while let Some(parent) = current.parent() {
            if Node::are_same(parent, self) {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    /// The lowest node that is an inclusive ancestor of both `a` and `b`.
    pub fn common_ancestor(a: NodeRef<'a>, b: NodeRef<'a>) -> Option<NodeRef<'a>> {
        let mut current = Some(a);
        while let Some(node) = current {
            if node.is_inclusive_ancestor_of(b) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// Visits `self` and its descendants in tree order. Returning `false`
    /// from `callback` skips the descendants of the visited node.
    pub fn for_each_in_inclusive_subtree<F>(&'a self, callback: &mut F)
    where
        F: FnMut(NodeRef<'a>) -> bool,
    {
        if !callback(self) {
            return;
        }

        let children = self.children().clone();
        for child in children {
            child.for_each_in_inclusive_subtree(callback);
        }
    }

    pub fn is_document_fragment(&self) -> bool {
        matches!(self.data, NodeData::DocumentFragment)
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self.data,
            NodeData::CharacterData {
                variant: CharacterDataVariant::Comment,
                ..
            }
        )
    }

    pub fn is_doctype(&self) -> bool {
        matches!(self.data, NodeData::Doctype { .. })
    }

    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    pub fn is_character_data(&self) -> bool {
        matches!(self.data, NodeData::CharacterData { .. })
    }

    pub fn is_processing_instruction(&self) -> bool {
        matches!(
            self.data,
            NodeData::CharacterData {
                variant: CharacterDataVariant::ProcessingInstruction { .. },
                ..
            }
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self.data,
            NodeData::CharacterData {
                variant: CharacterDataVariant::Text,
                ..
            }
        )
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-length
    pub fn length(&self) -> usize {
        match &self.data {
            NodeData::Doctype { .. } => 0,
            NodeData::CharacterData { data, .. } => data.borrow().chars().count(),
            _ => self.children.borrow().len(),
        }
    }

    pub fn element_tag_name(&self) -> Option<&str> {
        if let NodeData::Element { name, .. } = &self.data {
            return Some(&name.local);
        }
        None
    }

    pub fn attribute(&self, local_name: &str) -> Option<String> {
        let NodeData::Element { attributes, .. } = &self.data else {
            return None;
        };
        attributes
            .borrow()
            .iter()
            .find(|attribute| attribute.name.local == local_name)
            .map(|attribute| attribute.value.clone())
    }

    pub fn set_attribute(&self, local_name: &str, value: &str) -> Result<(), DomException> {
        let NodeData::Element { attributes, .. } = &self.data else {
            return Err(DomException::InvalidNodeTypeError);
        };
        let mut attributes = attributes.borrow_mut();
        match attributes
            .iter_mut()
            .find(|attribute| attribute.name.local == local_name)
        {
            Some(attribute) => attribute.value = value.to_string(),
            None => attributes.push(Attribute {
                name: QualifiedName::new(None, local_name.to_string()),
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    fn character_data(&self) -> Result<&RefCell<String>, DomException> {
        match &self.data {
            NodeData::CharacterData { data, .. } => Ok(data),
            _ => Err(DomException::InvalidNodeTypeError),
        }
    }

    pub fn data(&self) -> Option<String> {
        self.character_data().ok().map(|data| data.borrow().clone())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-cd-substring
    pub fn substring_data(&self, offset: usize, count: usize) -> Result<String, DomException> {
        let data = self.character_data()?.borrow();

        // SPEC: 1. Let length be node’s length.
        let length = data.chars().count();

        // SPEC: 2. If offset is greater than length, then throw an "IndexSizeError" DOMException.
        if offset > length {
            return Err(DomException::IndexSizeError);
        }

        // SPEC: 3. If offset plus count is greater than length, return a string whose value is the code units from the offsetth code unit to the end of node’s data, and then return.
        // SPEC: 4. Return a string whose value is the code units from the offsetth code unit to the offset+countth code unit in node’s data.
        Ok(data.chars().skip(offset).take(count).collect())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-cd-replace
    pub fn replace_data(
        &self,
        offset: usize,
        count: usize,
        replacement: &str,
    ) -> Result<(), DomException> {
        let cell = self.character_data()?;
        let mut data = cell.borrow_mut();

        // SPEC: 1. Let length be node’s length.
        let length = data.chars().count();

        // SPEC: 2. If offset is greater than length, then throw an "IndexSizeError" DOMException.
        if offset > length {
            return Err(DomException::IndexSizeError);
        }

        // SPEC: 3. If offset plus count is greater than length, then set count to length minus offset.
        let count = count.min(length - offset);

        let start = byte_offset(&data, offset);
        let end = byte_offset(&data, offset + count);
        data.replace_range(start..end, replacement);

        log::trace!("replaced {count} characters at offset {offset} with {replacement:?}");
        Ok(())
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-text-split
    pub fn split_text(&'a self, offset: usize) -> Result<NodeRef<'a>, DomException> {
        if !self.is_text() {
            return Err(DomException::InvalidNodeTypeError);
        }

        // SPEC: 1. Let length be node’s length.
        let length = self.length();

        // SPEC: 2. If offset is greater than length, then throw an "IndexSizeError" DOMException.
        if offset > length {
            return Err(DomException::IndexSizeError);
        }

        // SPEC: 3. Let count be length minus offset.
        let count = length - offset;

        // SPEC: 4. Let new data be the result of substringing data with node node, offset offset, and count count.
        let new_data = self.substring_data(offset, count)?;

        // SPEC: 5. Let new node be a new Text node, with the same node document as node. Set new node’s data to new data.
        let new_node = self.document().create_text_node(&new_data);

        // SPEC: 6. Let parent be node’s parent.
        // SPEC: 7. If parent is not null, then insert new node into parent before node’s next sibling.
        if let Some(parent) = self.parent() {
            parent.insert(new_node, self.next_sibling());
        }

        // SPEC: 8. Replace data with node node, offset offset, count count, and data the empty string.
        self.replace_data(offset, count, "")?;

        // SPEC: 9. Return new node.
        Ok(new_node)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-clone
    pub fn clone_node(&'a self, deep: bool) -> NodeRef<'a> {
        let document = match self.is_document() {
            true => None,
            false => Some(self.document()),
        };
        let copy: NodeRef<'a> = self
            .arena
            .alloc(Node::new(self.arena, document, self.data.clone()));

        if deep {
            let children = self.children().clone();
            for child in children {
                copy.insert(child.clone_node(true), None);
            }
        }

        copy
    }

    // SPECLINK: https://dom.spec.whatwg.org/#concept-node-equals
    pub fn is_equal_node(&self, other: &Node<'a>) -> bool {
        let data_matches = match (&self.data, &other.data) {
            (
                NodeData::Element {
                    name: a_name,
                    namespace: a_namespace,
                    attributes: a_attributes,
                },
                NodeData::Element {
                    name: b_name,
                    namespace: b_namespace,
                    attributes: b_attributes,
                },
            ) => {
                let a_attributes = a_attributes.borrow();
                let b_attributes = b_attributes.borrow();
                a_name == b_name
                    && a_namespace == b_namespace
                    && a_attributes.len() == b_attributes.len()
                    && a_attributes
                        .iter()
                        .all(|attribute| b_attributes.contains(attribute))
            }
            (a, b) => a == b,
        };

        let a_children = self.children();
        let b_children = other.children();
        data_matches
            && a_children.len() == b_children.len()
            && a_children
                .iter()
                .zip(b_children.iter())
                .all(|(a, b)| a.is_equal_node(b))
    }
}

// SPECLINK: https://dom.spec.whatwg.org/#concept-node-equals
impl<'a> PartialEq for Node<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal_node(other)
    }
}

fn byte_offset(data: &str, offset: usize) -> usize {
    data.char_indices()
        .nth(offset)
        .map_or(data.len(), |(index, _)| index)
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data)
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // destructuring will make it fail to compile
        // if you later add a field and forget to update here
        let Node {
            arena: _,
            document,
            parent,
            children,
            data,
        } = self;

        if self.is_document() {
            return write!(f, "Document {{ ... }}");
        }

        f.debug_struct("Node")
            .field("data", &data)
            .field("children", &children.borrow())
            .field("parent", &parent.get().map(|v| v.data.to_string()))
            .field("document", &document.get().map(|v| v.data.to_string()))
            .finish()
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum NodeData {
    Document,
    DocumentFragment,
    Element {
        name: QualifiedName,
        namespace: Option<Namespace>,
        attributes: RefCell<Vec<Attribute>>,
    },
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    CharacterData {
        data: RefCell<String>,
        variant: CharacterDataVariant,
    },
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum CharacterDataVariant {
    Text,
    ProcessingInstruction { target: String },
    Comment,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Document => write!(f, "Document"),
            NodeData::DocumentFragment => write!(f, "DocumentFragment"),
            NodeData::Doctype { name, .. } => write!(f, "DOCTYPE {name}"),
            NodeData::Element { name, .. } => write!(f, "Element({})", name.local),
            NodeData::CharacterData { variant, data } => match variant {
                CharacterDataVariant::Text => write!(f, "Text({:?})", data.borrow()),
                CharacterDataVariant::ProcessingInstruction { target } => {
                    write!(f, "ProcessingInstruction({target})")
                }
                CharacterDataVariant::Comment => write!(f, "Comment({:?})", data.borrow()),
            },
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
    fn are_same_optional() {
        let arena = NodeArena::new();
        let a = Node::new_document(&arena);
        let b = Node::new_document(&arena);

        assert_eq!(Node::are_same_optional(Some(a), Some(b)), false);
        assert_eq!(Node::are_same_optional(Some(a), None), false);
        assert_eq!(Node::are_same_optional(None, Some(b)), false);
        assert_eq!(Node::are_same_optional(Some(a), Some(a)), true);
        assert_eq!(Node::are_same_optional(None, None), true);
    }

    #[test]
    fn are_same() {
        let arena = NodeArena::new();
        let a = Node::new_document(&arena);
        let b = Node::new_document(&arena);

        assert_eq!(Node::are_same(a, b), false);
        assert_eq!(Node::are_same(b, a), false);
        assert_eq!(Node::are_same(a, a), true);
    }

    #[test]
    fn ancestry_and_indices() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let html = document.create_element("html");
        let body = document.create_element("body");
        let first = document.create_text_node("first");
        let second = document.create_text_node("second");
        document.append_child(html).unwrap();
        html.append_child(body).unwrap();
        body.append_child(first).unwrap();
        body.append_child(second).unwrap();

        assert!(Node::are_same(second.root(), document));
        assert_eq!(second.index(), 1);
        assert!(Node::are_same_optional(second.previous_sibling(), Some(first)));
        assert!(Node::are_same_optional(first.next_sibling(), Some(second)));
        assert!(second.next_sibling().is_none());
        assert!(html.is_ancestor_of(second));
        assert!(!second.is_ancestor_of(second));
        assert!(second.is_inclusive_ancestor_of(second));
        assert!(Node::are_same_optional(html.child_towards(second), Some(body)));
        assert!(body.child_towards(html).is_none());
        assert!(Node::are_same_optional(
            Node::common_ancestor(first, second),
            Some(body)
        ));
        assert_eq!(second.inclusive_ancestors().len(), 4);
    }

    #[test]
    fn detached_nodes_are_their_own_root() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let div = document.create_element("div");

        assert!(Node::are_same(div.root(), div));
        assert!(!Node::have_same_root(div, document));
        assert!(Node::are_same(div.document(), document));
    }

    #[test]
    fn character_data_editing() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let text = document.create_text_node("héllo");

        assert_eq!(text.length(), 5);
        assert_eq!(text.substring_data(1, 3).unwrap(), "éll");
        assert_eq!(text.substring_data(3, 10).unwrap(), "lo");
        assert_eq!(text.substring_data(6, 1), Err(DomException::IndexSizeError));

        text.replace_data(1, 2, "a").unwrap();
        assert_eq!(text.data().as_deref(), Some("halo"));
        text.replace_data(2, 100, "").unwrap();
        assert_eq!(text.data().as_deref(), Some("ha"));
        assert_eq!(document.data(), None);
    }

    #[test]
    fn split_text_inserts_the_tail_after_the_node() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let p = document.create_element("p");
        let text = document.create_text_node("hello");
        let after = document.create_element("br");
        p.append_child(text).unwrap();
        p.append_child(after).unwrap();

        let tail = text.split_text(2).unwrap();

        assert_eq!(text.data().as_deref(), Some("he"));
        assert_eq!(tail.data().as_deref(), Some("llo"));
        assert_eq!(p.length(), 3);
        assert_eq!(tail.index(), 1);
        assert_eq!(text.split_text(5), Err(DomException::IndexSizeError));
        assert_eq!(p.split_text(0), Err(DomException::InvalidNodeTypeError));
    }

    #[test]
    fn deep_clone_is_equal_but_not_same() {
        let arena = NodeArena::new();
        let document = Node::new_document(&arena);
        let div = document.create_element("div");
        div.set_attribute("class", "note").unwrap();
        div.append_child(document.create_text_node("text")).unwrap();
        div.append_child(document.create_comment("comment")).unwrap();

        let deep = div.clone_node(true);
        let shallow = div.clone_node(false);

        assert!(deep.is_equal_node(div));
        assert!(!Node::are_same(deep, div));
        assert!(deep.parent().is_none());
        assert_eq!(deep.attribute("class").as_deref(), Some("note"));
        assert_eq!(shallow.length(), 0);
        assert!(!shallow.is_equal_node(div));

        deep.set_attribute("class", "other").unwrap();
        assert!(!deep.is_equal_node(div));
    }
}
