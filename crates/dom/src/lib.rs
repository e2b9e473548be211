//! Arena document tree with a patch protocol, focus tracking, and a
//! mutation observer channel.
//!
//! Hosts build and mutate a [`Document`] by applying [`DomPatch`] batches;
//! consumers watch structural changes through [`observer_channel`] and read
//! or rewrite text through the accessor API.

mod arena;
mod focus;
mod observe;
mod patch;

pub mod text;
pub mod walk;

pub use arena::{Document, NodeKind, PatchError};
pub use focus::is_editing_context;
pub use observe::{MutationBatch, observer_channel};
pub use patch::{DomPatch, KeySeq, NodeKey, RawKey};
