//! Session lifecycle: the activation state machine and the per-node
//! substitution pipeline.
//!
//! Invariants:
//! - `active` flips only in `start` and `stop`; both are no-ops when the
//!   session is already in the requested state.
//! - A watcher exists exactly while the session is active. Stop drops the
//!   receiving end, so batches queued before deactivation are never
//!   delivered, and a later start sees only its own channel.
//! - Backups are written at most once per node and survive until restore or
//!   teardown. A backup whose node has been removed is garbage and is swept
//!   on stop.
//! - Every handler re-checks `active` before touching the document, so a
//!   stale delivery attempt cannot mutate text.

use crate::backups::BackupStore;
use crate::engine::translate;
use dom::{Document, MutationBatch, NodeKey, observer_channel, walk};
use lexicon::Lexicon;
use std::sync::mpsc::Receiver;

const OPAQUE_TAGS: [&str; 6] = ["script", "style", "code", "textarea", "noscript", "input"];

/// Tuning for a substitution session.
#[derive(Debug, Clone)]
pub struct ShredConfig {
    /// Element names whose direct text children are never rewritten.
    /// Compared against canonical element names, ASCII case ignored.
    pub opaque_tags: Vec<String>,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            opaque_tags: OPAQUE_TAGS.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

/// Activation flag plus the watcher handle whose lifetime tracks it.
struct ModeState {
    active: bool,
    watcher: Option<Watcher>,
}

struct Watcher {
    rx: Receiver<MutationBatch>,
}

impl Watcher {
    fn try_next(&self) -> Option<MutationBatch> {
        self.rx.try_recv().ok()
    }
}

/// One substitution session over one document.
///
/// The session owns the dictionary, the backup table, and the mode state;
/// the document is passed into each call so the host keeps ownership of the
/// tree.
pub struct Session {
    lexicon: Lexicon,
    config: ShredConfig,
    backups: BackupStore,
    mode: ModeState,
}

impl Session {
    pub fn new(lexicon: Lexicon) -> Self {
        Self::with_config(lexicon, ShredConfig::default())
    }

    pub fn with_config(lexicon: Lexicon, config: ShredConfig) -> Self {
        Self {
            lexicon,
            config,
            backups: BackupStore::new(),
            mode: ModeState {
                active: false,
                watcher: None,
            },
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode.active
    }

    /// Number of nodes currently holding a backup.
    pub fn tracked_nodes(&self) -> usize {
        self.backups.len()
    }

    /// Activate: shred every eligible text node, then attach a watcher so
    /// later insertions get the same treatment. No-op when already active.
    pub fn start(&mut self, doc: &mut Document) {
        if self.mode.active {
            return;
        }
        self.mode.active = true;
        if let Some(root) = doc.root() {
            for key in walk::text_nodes_under(doc, root) {
                self.shred_node(doc, key);
            }
        }
        if self.mode.watcher.is_none() {
            let (tx, rx) = observer_channel();
            doc.set_observer(tx);
            self.mode.watcher = Some(Watcher { rx });
        }
        log::debug!(
            target: "shred.session",
            "substitution on, {} nodes tracked",
            self.backups.len()
        );
    }

    /// Deactivate: tear down the watcher first so nothing new is observed,
    /// then restore every tracked node still in the tree. No-op when already
    /// inactive.
    pub fn stop(&mut self, doc: &mut Document) {
        if !self.mode.active {
            return;
        }
        self.mode.active = false;
        doc.clear_observer();
        self.mode.watcher = None;
        if let Some(root) = doc.root() {
            for key in walk::text_nodes_under(doc, root) {
                self.restore_node(doc, key);
            }
        }
        let swept = self.backups.len();
        self.backups.clear();
        log::debug!(
            target: "shred.session",
            "substitution off, {swept} stale backups swept"
        );
    }

    /// Stop when active, start when not. Returns the new active state.
    pub fn toggle(&mut self, doc: &mut Document) -> bool {
        if self.mode.active {
            self.stop(doc);
        } else {
            self.start(doc);
        }
        self.mode.active
    }

    /// Drain queued mutation batches through the per-node pipeline.
    ///
    /// The active flag is re-checked before every batch; a stop between
    /// batches discards the rest unprocessed.
    pub fn deliver_pending(&mut self, doc: &mut Document) {
        loop {
            if !self.mode.active {
                return;
            }
            let Some(batch) = self.mode.watcher.as_ref().and_then(Watcher::try_next) else {
                return;
            };
            self.on_batch(doc, batch);
        }
    }

    fn on_batch(&mut self, doc: &mut Document, batch: MutationBatch) {
        log::trace!(
            target: "shred.watch",
            "batch of {} inserted nodes",
            batch.inserted.len()
        );
        for key in batch.inserted {
            if !doc.contains(key) {
                continue;
            }
            if doc.is_text(key) {
                self.shred_node(doc, key);
            } else {
                for text in walk::text_nodes_under(doc, key) {
                    self.shred_node(doc, text);
                }
            }
        }
    }

    /// Substitute one text node, bookkeeping included.
    ///
    /// Skips ineligible nodes (whitespace-only content, opaque parent).
    /// Snapshots the original on first encounter; once current content has
    /// diverged from the backup the node counts as already shredded and the
    /// call is a no-op, which makes redelivery safe.
    fn shred_node(&mut self, doc: &mut Document, key: NodeKey) {
        if !self.mode.active {
            return;
        }
        let Some(current) = doc.text(key) else {
            return;
        };
        if current.trim().is_empty() {
            return;
        }
        let current = current.to_string();
        if let Some(parent) = doc.parent_element_name(key) {
            if self.is_opaque(parent) {
                return;
            }
        }
        let pristine = self.backups.snapshot(key, &current) == current.as_str();
        if !pristine {
            return;
        }
        let translated = translate(&self.lexicon, &current);
        if translated != current {
            log::trace!(
                target: "shred.session",
                "shredded {key:?} ({} -> {} bytes)",
                current.len(),
                translated.len()
            );
            doc.set_text(key, translated);
        }
    }

    /// Put one node's original text back and drop its backup. Total: nodes
    /// without a backup are left alone.
    fn restore_node(&mut self, doc: &mut Document, key: NodeKey) {
        if let Some(original) = self.backups.forget(key) {
            doc.set_text(key, original);
        }
    }

    fn is_opaque(&self, name: &str) -> bool {
        self.config
            .opaque_tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(name))
    }
}
