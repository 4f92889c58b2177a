use std::cell::Cell;

use crate::node::Node;

/// The arena every node of a document is allocated in.
pub type NodeArena<'arena> = typed_arena::Arena<Node<'arena>>;
pub type Arena<'arena> = &'arena NodeArena<'arena>;
pub type NodeRef<'arena> = &'arena Node<'arena>;
pub type NodeLink<'arena> = Cell<Option<NodeRef<'arena>>>;
