#![allow(dead_code)]

use dom::arena::{NodeArena, NodeRef};
use dom::node::Node;

/// ```text
/// #document
/// ├── <!DOCTYPE html>
/// └── html
///     └── body
///         ├── p ─┬── "hello "
///         │      ├── b ── "bold"
///         │      └── " world"
///         └── p ──── "second"
/// ```
pub struct Tree<'a> {
    pub document: NodeRef<'a>,
    pub doctype: NodeRef<'a>,
    pub html: NodeRef<'a>,
    pub body: NodeRef<'a>,
    pub first: NodeRef<'a>,
    pub hello: NodeRef<'a>,
    pub b: NodeRef<'a>,
    pub bold: NodeRef<'a>,
    pub world: NodeRef<'a>,
    pub second: NodeRef<'a>,
    pub second_text: NodeRef<'a>,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn tree<'a>(arena: &'a NodeArena<'a>) -> Tree<'a> {
    init_logging();

    let document = Node::new_document(arena);
    let doctype = document.create_document_type("html", "", "");
    let html = document.create_element("html");
    let body = document.create_element("body");
    let first = document.create_element("p");
    let hello = document.create_text_node("hello ");
    let b = document.create_element("b");
    let bold = document.create_text_node("bold");
    let world = document.create_text_node(" world");
    let second = document.create_element("p");
    let second_text = document.create_text_node("second");

    document.append_child(doctype).unwrap();
    document.append_child(html).unwrap();
    html.append_child(body).unwrap();
    body.append_child(first).unwrap();
    first.append_child(hello).unwrap();
    first.append_child(b).unwrap();
    b.append_child(bold).unwrap();
    first.append_child(world).unwrap();
    body.append_child(second).unwrap();
    second.append_child(second_text).unwrap();

    Tree {
        document,
        doctype,
        html,
        body,
        first,
        hello,
        b,
        bold,
        world,
        second,
        second_text,
    }
}

/// The concatenated data of every text node under `node`, in tree order.
pub fn text_content(node: NodeRef<'_>) -> String {
    let mut text = String::new();
    node.for_each_in_inclusive_subtree(&mut |node| {
        if node.is_text() {
            text.push_str(&node.data().unwrap_or_default());
        }
        true
    });
    text
}

/// One line per child of `node`, as the child displays itself.
pub fn children_of(node: NodeRef<'_>) -> Vec<String> {
    node.children().iter().map(|child| child.to_string()).collect()
}

/// Looks up a fixture node by the name of its field.
pub fn node<'a>(tree: &Tree<'a>, name: &str) -> NodeRef<'a> {
    match name {
        "document" => tree.document,
        "doctype" => tree.doctype,
        "html" => tree.html,
        "body" => tree.body,
        "first" => tree.first,
        "hello" => tree.hello,
        "b" => tree.b,
        "bold" => tree.bold,
        "world" => tree.world,
        "second" => tree.second,
        "second_text" => tree.second_text,
        _ => panic!("no fixture node named {name}"),
    }
}

/// Every node of the fixture, in tree order.
pub fn all_nodes<'a>(tree: &Tree<'a>) -> Vec<NodeRef<'a>> {
    let mut nodes = Vec::new();
    tree.document.for_each_in_inclusive_subtree(&mut |node| {
        nodes.push(node);
        true
    });
    nodes
}
