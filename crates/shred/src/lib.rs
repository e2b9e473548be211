//! Live, reversible text substitution over a document tree.
//!
//! A [`Session`] greedily rewrites visible text using a [`lexicon::Lexicon`],
//! keeps a per-node backup so the rewrite is idempotent and perfectly
//! reversible, and follows live document mutations through the tree's
//! observer channel while active.

mod backups;
mod engine;
mod session;
mod status;

pub use backups::BackupStore;
pub use engine::translate;
pub use session::{Session, ShredConfig};
pub use status::Banner;
