//! Structural patch protocol for the document arena.
//!
//! Patches are the only structural mutation channel: hosts build and change
//! the tree by applying batches of these operations.
//!
//! Invariants:
//! - Patches are applied in order.
//! - References must point to live keys at the time they are used (except
//!   the `key` in create operations).
//! - Child ordering is explicit and deterministic.
//! - All `NodeKey` values used in patches must be non-zero (`NodeKey::INVALID`
//!   is never valid in a patch).
//! - Element and attribute names are canonicalized to ASCII lowercase when the
//!   node is created; patch producers may use any casing.
//! - Operations must not create cycles; a node has at most one parent.
//! - Keys are never reused: once a key has been created it stays allocated for
//!   the document's lifetime, even after the node is removed.

pub type RawKey = u32;

/// Stable node identity within a document.
///
/// Keys are minted by the host (see [`KeySeq`]) and stay unique for the
/// document's lifetime, which makes them safe to use in side tables that
/// outlive the node itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub RawKey);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);
}

/// Monotonic key allocator for hosts that build documents by hand.
#[derive(Debug)]
pub struct KeySeq {
    next: RawKey,
}

impl KeySeq {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_key(&mut self) -> NodeKey {
        let key = NodeKey(self.next);
        self.next = self.next.wrapping_add(1);
        key
    }
}

impl Default for KeySeq {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural mutation operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomPatch {
    /// Create the document root node. Valid once per document.
    CreateDocument {
        key: NodeKey,
        doctype: Option<String>,
    },
    /// Create a detached element node with initial attributes.
    CreateElement {
        key: NodeKey,
        name: String,
        attributes: Vec<(String, Option<String>)>,
    },
    /// Create a detached text node.
    CreateText { key: NodeKey, text: String },
    /// Create a detached comment node.
    CreateComment { key: NodeKey, text: String },
    /// Append a child to the end of a parent's children list.
    AppendChild { parent: NodeKey, child: NodeKey },
    /// Insert a child before an existing sibling.
    InsertBefore {
        parent: NodeKey,
        child: NodeKey,
        before: NodeKey,
    },
    /// Remove a node and its entire subtree from the document.
    ///
    /// Keys in the removed subtree are dead for the rest of the document's
    /// lifetime.
    RemoveNode { key: NodeKey },
    /// Replace the text content of a text node.
    ///
    /// Applying this to a non-text node is a deterministic error. Text
    /// replacement is not reported to the observer (the observer is
    /// structural only).
    SetText { key: NodeKey, text: String },
    /// Replace all attributes on an element node.
    ///
    /// Applying this to a non-element node is a deterministic error.
    SetAttributes {
        key: NodeKey,
        attributes: Vec<(String, Option<String>)>,
    },
}
