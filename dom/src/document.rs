use std::cell::RefCell;

use crate::arena::{Arena, NodeRef};
use crate::node::{CharacterDataVariant, Node, NodeData};
use crate::{Namespace, QualifiedName};

// Node factories. Every node created here shares the arena of the document
// it is created by and has that document as its node document.
impl<'a> Node<'a> {
    pub fn new_document(arena: Arena<'a>) -> NodeRef<'a> {
        arena.alloc(Node::new(arena, None, NodeData::Document))
    }

    fn create(&'a self, data: NodeData) -> NodeRef<'a> {
        let document = self.document();
        self.arena
            .alloc(Node::new(self.arena, Some(document), data))
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-document-createelement
    pub fn create_element(&'a self, local_name: &str) -> NodeRef<'a> {
        self.create(NodeData::Element {
            name: QualifiedName::new(None, local_name.to_string()),
            namespace: Some(Namespace::Html),
            attributes: RefCell::new(Vec::new()),
        })
    }

    pub fn create_text_node(&'a self, data: &str) -> NodeRef<'a> {
        self.create(NodeData::CharacterData {
            data: RefCell::new(data.to_string()),
            variant: CharacterDataVariant::Text,
        })
    }

    pub fn create_comment(&'a self, data: &str) -> NodeRef<'a> {
        self.create(NodeData::CharacterData {
            data: RefCell::new(data.to_string()),
            variant: CharacterDataVariant::Comment,
        })
    }

    pub fn create_processing_instruction(&'a self, target: &str, data: &str) -> NodeRef<'a> {
        self.create(NodeData::CharacterData {
            data: RefCell::new(data.to_string()),
            variant: CharacterDataVariant::ProcessingInstruction {
                target: target.to_string(),
            },
        })
    }

    pub fn create_document_fragment(&'a self) -> NodeRef<'a> {
        self.create(NodeData::DocumentFragment)
    }

    // SPECLINK: https://dom.spec.whatwg.org/#dom-domimplementation-createdocumenttype
    pub fn create_document_type(
        &'a self,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> NodeRef<'a> {
        self.create(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }
}
