//! Storage layer
//!
//! JSON files under the data directory: the ledger collections, the draft
//! store, and the helpers that write them atomically.

pub mod collection;
pub mod draft_store;
pub mod file_io;
pub mod ledger;

pub use draft_store::{DraftStore, JsonDraftStore, MemoryDraftStore};
pub use ledger::Ledger;
