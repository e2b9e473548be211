//! Side table of pristine text, keyed by node identity.
//!
//! Node keys are never reused by the document, so a stale entry can only
//! refer to a removed node. Such entries are garbage with no obligation and
//! get swept by [`BackupStore::clear`] on teardown.

use dom::NodeKey;
use std::collections::HashMap;

/// Original content for every node touched while substitution is active.
#[derive(Debug, Default)]
pub struct BackupStore {
    originals: HashMap<NodeKey, String>,
}

impl BackupStore {
    pub fn new() -> Self {
        Self {
            originals: HashMap::new(),
        }
    }

    /// Record `current` as the node's original unless one is already held;
    /// the original is written at most once per node. Returns the stored
    /// original either way.
    pub fn snapshot(&mut self, key: NodeKey, current: &str) -> &str {
        self.originals
            .entry(key)
            .or_insert_with(|| current.to_string())
    }

    /// The stored original, if this node has been snapshotted.
    pub fn original(&self, key: NodeKey) -> Option<&str> {
        self.originals.get(&key).map(String::as_str)
    }

    /// Take the original out of the table, ending the node's tracked life.
    pub fn forget(&mut self, key: NodeKey) -> Option<String> {
        self.originals.remove(&key)
    }

    pub fn is_tracked(&self, key: NodeKey) -> bool {
        self.originals.contains_key(&key)
    }

    /// Drop every entry. Called on deactivation after the restore pass, when
    /// anything left in the table belongs to removed nodes.
    pub fn clear(&mut self) {
        self.originals.clear();
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_writes_once() {
        let mut store = BackupStore::new();
        let key = NodeKey(7);
        assert_eq!(store.snapshot(key, "first"), "first");
        assert_eq!(store.snapshot(key, "second"), "first");
        assert_eq!(store.original(key), Some("first"));
    }

    #[test]
    fn forget_ends_tracking() {
        let mut store = BackupStore::new();
        let key = NodeKey(7);
        store.snapshot(key, "kept");
        assert_eq!(store.forget(key), Some("kept".to_string()));
        assert_eq!(store.forget(key), None);
        assert!(!store.is_tracked(key));
    }

    #[test]
    fn clear_sweeps_everything() {
        let mut store = BackupStore::new();
        store.snapshot(NodeKey(1), "a");
        store.snapshot(NodeKey(2), "b");
        store.clear();
        assert!(store.is_empty());
    }
}
