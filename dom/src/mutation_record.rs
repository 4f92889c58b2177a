use crate::arena::NodeRef;

/// A single edit to a node tree, described with the positions that ranges
/// need in order to keep their boundary points valid.
///
/// Records carry the tree state at the time of the edit: indices are the
/// indices the affected nodes had when the edit happened.
#[derive(Debug, Clone, Copy)]
pub enum MutationRecord<'arena> {
    /// `count` nodes were inserted into `parent` before the child that was
    /// at `index` (or appended, when `index` equals the old length).
    ChildInserted {
        parent: NodeRef<'arena>,
        index: usize,
        count: usize,
    },
    /// `node` was removed from `parent`, where it had index `index`.
    ChildRemoved {
        parent: NodeRef<'arena>,
        index: usize,
        node: NodeRef<'arena>,
    },
    /// `count` characters at `offset` in `node` were replaced by `inserted`
    /// characters.
    CharacterDataReplaced {
        node: NodeRef<'arena>,
        offset: usize,
        count: usize,
        inserted: usize,
    },
    /// `node` was split at `offset`; the tail moved to `new_node`, which was
    /// inserted right after `node` (at `index + 1` in `parent`).
    TextSplit {
        node: NodeRef<'arena>,
        new_node: NodeRef<'arena>,
        offset: usize,
        parent: Option<NodeRef<'arena>>,
        index: usize,
    },
}
