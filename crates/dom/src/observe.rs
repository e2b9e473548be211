//! Structural mutation notifications.
//!
//! A document carries at most one observer. Each successful `Document::apply`
//! call that attached nodes sends one batch to the observer; batches queue in
//! the channel until the owner of the receiver drains them, which models
//! deferred mutation callbacks delivered on a later turn. Detaching drops the
//! document-side sender, and a consumer that stops listening drops its
//! receiver with anything still queued, so no batch survives a
//! detach/re-attach cycle.

use crate::patch::NodeKey;
use std::sync::mpsc::{self, Receiver, Sender};

/// One batch of structural changes, in attach order.
///
/// A key listed here may already be dead by the time the batch is delivered
/// (attached and removed in the same or a later batch); consumers must skip
/// keys that are no longer live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationBatch {
    pub inserted: Vec<NodeKey>,
}

/// Channel pair connecting a document to its observer.
pub fn observer_channel() -> (Sender<MutationBatch>, Receiver<MutationBatch>) {
    mpsc::channel()
}
