//! Deduplicated per-owner string storage.
//!
//! Conditional restriction text is stored per edge and timezone ids per
//! node. Both repeat heavily, so each store keeps a table of distinct values
//! and a compact index from owner id to value id.

mod dedup;
mod error;
mod segment;
mod value_store;

pub use dedup::{DedupIndex, EntryWidth};
pub use error::StorageError;
pub use value_store::{DedupValueStore, StoreConfig};
