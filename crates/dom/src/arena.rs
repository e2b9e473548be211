//! Arena-backed document tree with patch application and observer plumbing.

use crate::observe::MutationBatch;
use crate::patch::{DomPatch, NodeKey};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Sender;

#[derive(Debug, PartialEq, Eq)]
pub enum PatchError {
    InvalidKey(NodeKey),
    DuplicateKey(NodeKey),
    MissingKey(NodeKey),
    WrongNodeKind(NodeKey),
    InvalidParent(NodeKey),
    InvalidSibling { parent: NodeKey, before: NodeKey },
    CycleDetected { parent: NodeKey, child: NodeKey },
    RootAlreadySet(NodeKey),
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchError::InvalidKey(key) => write!(f, "invalid node key: {key:?}"),
            PatchError::DuplicateKey(key) => write!(f, "node key already allocated: {key:?}"),
            PatchError::MissingKey(key) => write!(f, "no live node for key: {key:?}"),
            PatchError::WrongNodeKind(key) => write!(f, "operation does not apply to node: {key:?}"),
            PatchError::InvalidParent(key) => write!(f, "invalid parent for attach: {key:?}"),
            PatchError::InvalidSibling { parent, before } => {
                write!(f, "{before:?} is not a child of {parent:?}")
            }
            PatchError::CycleDetected { parent, child } => {
                write!(f, "attaching {child:?} under {parent:?} would create a cycle")
            }
            PatchError::RootAlreadySet(key) => {
                write!(f, "document root already exists: {key:?}")
            }
        }
    }
}

impl std::error::Error for PatchError {}

#[derive(Debug)]
pub enum NodeKind {
    Document {
        doctype: Option<String>,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document { .. } | NodeKind::Element { .. })
    }
}

/// A single live document: arena of node records plus focus and observer
/// state.
///
/// Structural changes go through [`Document::apply`]; text rewrites by an
/// in-process consumer (as opposed to the host's patch stream) can use
/// [`Document::set_text`] directly, which is deliberately not observable.
pub struct Document {
    nodes: Vec<NodeRecord>,
    live: HashMap<NodeKey, usize>,
    allocated: HashSet<NodeKey>,
    root: Option<NodeKey>,
    focus: Option<NodeKey>,
    observer: Option<Sender<MutationBatch>>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            live: HashMap::new(),
            allocated: HashSet::new(),
            root: None,
            focus: None,
            observer: None,
        }
    }

    /// Apply a batch of patches in order.
    ///
    /// On success, one [`MutationBatch`] listing every key attached by the
    /// batch is sent to the attached observer (if any, and if anything was
    /// attached). On error the batch may have been partially applied but no
    /// notification is sent; patch errors indicate host bugs, not recoverable
    /// conditions.
    pub fn apply(&mut self, patches: &[DomPatch]) -> Result<(), PatchError> {
        let mut inserted = Vec::new();
        for patch in patches {
            self.apply_one(patch, &mut inserted)?;
        }
        log::trace!(
            target: "dom.apply",
            "applied {} patches, {} nodes attached",
            patches.len(),
            inserted.len()
        );
        self.notify(inserted);
        Ok(())
    }

    fn apply_one(
        &mut self,
        patch: &DomPatch,
        inserted: &mut Vec<NodeKey>,
    ) -> Result<(), PatchError> {
        match patch {
            DomPatch::CreateDocument { key, doctype } => {
                if let Some(root) = self.root {
                    return Err(PatchError::RootAlreadySet(root));
                }
                self.insert_node(
                    *key,
                    NodeKind::Document {
                        doctype: doctype.clone(),
                    },
                )?;
                self.root = Some(*key);
            }
            DomPatch::CreateElement {
                key,
                name,
                attributes,
            } => {
                self.insert_node(
                    *key,
                    NodeKind::Element {
                        name: name.to_ascii_lowercase(),
                        attributes: canonical_attributes(attributes),
                    },
                )?;
            }
            DomPatch::CreateText { key, text } => {
                self.insert_node(*key, NodeKind::Text { text: text.clone() })?;
            }
            DomPatch::CreateComment { key, text } => {
                self.insert_node(*key, NodeKind::Comment { text: text.clone() })?;
            }
            DomPatch::AppendChild { parent, child } => {
                self.attach(*parent, *child, None)?;
                inserted.push(*child);
            }
            DomPatch::InsertBefore {
                parent,
                child,
                before,
            } => {
                self.attach(*parent, *child, Some(*before))?;
                inserted.push(*child);
            }
            DomPatch::RemoveNode { key } => {
                self.ensure_live(*key)?;
                if self.root == Some(*key) {
                    self.root = None;
                }
                self.remove_subtree(*key);
            }
            DomPatch::SetText { key, text } => {
                self.ensure_live(*key)?;
                if !self.set_text(*key, text.clone()) {
                    return Err(PatchError::WrongNodeKind(*key));
                }
            }
            DomPatch::SetAttributes { key, attributes } => {
                let index = self.index_of(*key)?;
                match &mut self.nodes[index].kind {
                    NodeKind::Element {
                        attributes: attrs, ..
                    } => {
                        *attrs = canonical_attributes(attributes);
                    }
                    _ => return Err(PatchError::WrongNodeKind(*key)),
                }
            }
        }
        Ok(())
    }

    fn insert_node(&mut self, key: NodeKey, kind: NodeKind) -> Result<(), PatchError> {
        if key == NodeKey::INVALID {
            return Err(PatchError::InvalidKey(key));
        }
        if self.allocated.contains(&key) {
            return Err(PatchError::DuplicateKey(key));
        }
        let index = self.nodes.len();
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.allocated.insert(key);
        self.live.insert(key, index);
        Ok(())
    }

    fn attach(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), PatchError> {
        if parent == child || self.is_descendant(child, parent) {
            return Err(PatchError::CycleDetected { parent, child });
        }
        let parent_index = self.index_of(parent)?;
        let child_index = self.index_of(child)?;
        if !self.nodes[parent_index].allows_children() {
            return Err(PatchError::InvalidParent(parent));
        }
        if self.nodes[child_index].parent.is_some() {
            return Err(PatchError::InvalidParent(child));
        }
        match before {
            None => self.nodes[parent_index].children.push(child),
            Some(before) => {
                let before_index = self.index_of(before)?;
                if self.nodes[before_index].parent != Some(parent) {
                    return Err(PatchError::InvalidSibling { parent, before });
                }
                let siblings = &mut self.nodes[parent_index].children;
                let pos = siblings
                    .iter()
                    .position(|k| *k == before)
                    .ok_or(PatchError::InvalidSibling { parent, before })?;
                siblings.insert(pos, child);
            }
        }
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    fn remove_subtree(&mut self, key: NodeKey) {
        let Some(index) = self.live.remove(&key) else {
            return;
        };
        if let Some(parent) = self.nodes[index].parent.take() {
            if let Some(&parent_index) = self.live.get(&parent) {
                self.nodes[parent_index].children.retain(|k| *k != key);
            }
        }
        let mut stack = std::mem::take(&mut self.nodes[index].children);
        while let Some(current) = stack.pop() {
            if let Some(current_index) = self.live.remove(&current) {
                self.nodes[current_index].parent = None;
                let mut grandchildren = std::mem::take(&mut self.nodes[current_index].children);
                stack.append(&mut grandchildren);
            }
        }
    }

    fn is_descendant(&self, ancestor: NodeKey, maybe_descendant: NodeKey) -> bool {
        let Some(&index) = self.live.get(&ancestor) else {
            return false;
        };
        let mut stack: Vec<NodeKey> = self.nodes[index].children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Some(&child_index) = self.live.get(&current) {
                stack.extend(self.nodes[child_index].children.iter().copied());
            }
        }
        false
    }

    fn ensure_live(&self, key: NodeKey) -> Result<(), PatchError> {
        self.index_of(key).map(|_| ())
    }

    fn index_of(&self, key: NodeKey) -> Result<usize, PatchError> {
        if key == NodeKey::INVALID {
            return Err(PatchError::InvalidKey(key));
        }
        self.live
            .get(&key)
            .copied()
            .ok_or(PatchError::MissingKey(key))
    }

    // --- Observer ---

    /// Attach the observer sender. Replaces any previous observer.
    pub fn set_observer(&mut self, tx: Sender<MutationBatch>) {
        self.observer = Some(tx);
    }

    /// Detach the observer. Queued batches die with the receiver.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    fn notify(&mut self, inserted: Vec<NodeKey>) {
        if inserted.is_empty() {
            return;
        }
        if let Some(tx) = &self.observer {
            if tx.send(MutationBatch { inserted }).is_err() {
                // Receiver gone without a detach; drop the dead sender.
                self.observer = None;
            }
        }
    }

    // --- Focus ---

    /// Set the focused node, mirroring a document's active element.
    ///
    /// Returns false (leaving focus unchanged) if the key is not live.
    pub fn set_focus(&mut self, key: Option<NodeKey>) -> bool {
        match key {
            Some(key) if !self.live.contains_key(&key) => false,
            other => {
                self.focus = other;
                true
            }
        }
    }

    /// Currently focused node, if it is still in the document.
    pub fn focused(&self) -> Option<NodeKey> {
        self.focus.filter(|key| self.live.contains_key(key))
    }

    // --- Accessors ---

    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.live.contains_key(&key)
    }

    pub fn is_text(&self, key: NodeKey) -> bool {
        self.text(key).is_some()
    }

    /// Text content of a live text node.
    pub fn text(&self, key: NodeKey) -> Option<&str> {
        match self.kind(key)? {
            NodeKind::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Overwrite a live text node's content in place.
    ///
    /// Returns whether the write happened. This path is not observable; it
    /// exists for consumers rewriting text they are already tracking.
    pub fn set_text(&mut self, key: NodeKey, text: String) -> bool {
        let Some(&index) = self.live.get(&key) else {
            return false;
        };
        match &mut self.nodes[index].kind {
            NodeKind::Text { text: existing } => {
                *existing = text;
                true
            }
            _ => false,
        }
    }

    /// Canonical (lowercase) element name of a live element node.
    pub fn element_name(&self, key: NodeKey) -> Option<&str> {
        match self.kind(key)? {
            NodeKind::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Value of an attribute on a live element, if present with a value.
    pub fn attribute(&self, key: NodeKey, name: &str) -> Option<&str> {
        self.attribute_entry(key, name)?.as_deref()
    }

    /// Whether the attribute is present at all (with or without a value).
    pub fn has_attribute(&self, key: NodeKey, name: &str) -> bool {
        self.attribute_entry(key, name).is_some()
    }

    fn attribute_entry(&self, key: NodeKey, name: &str) -> Option<&Option<String>> {
        match self.kind(key)? {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        let &index = self.live.get(&key)?;
        self.nodes[index].parent
    }

    /// Name of the nearest element ancestor, i.e. the parent when the parent
    /// is an element. Text directly under the document root has none.
    pub fn parent_element_name(&self, key: NodeKey) -> Option<&str> {
        self.element_name(self.parent(key)?)
    }

    /// Children of a live container node, in document order. Empty for
    /// leaves and dead keys.
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        match self.live.get(&key) {
            Some(&index) => &self.nodes[index].children,
            None => &[],
        }
    }

    pub fn kind(&self, key: NodeKey) -> Option<&NodeKind> {
        let &index = self.live.get(&key)?;
        Some(&self.nodes[index].kind)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_attributes(attributes: &[(String, Option<String>)]) -> Vec<(String, Option<String>)> {
    attributes
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect()
}
