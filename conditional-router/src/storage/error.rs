//! Storage error types.

/// Errors from the deduplicated value stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// create/load called on a store that already holds data
    #[error("store '{0}' must be initialized only once")]
    AlreadyInitialized(String),

    /// Access before create/load, or after close
    #[error("store '{0}' is not initialized")]
    NotInitialized(String),

    /// A new distinct value would not fit the index width
    #[error("store '{name}' capacity exceeded: at most {limit} distinct values")]
    CapacityExceeded { name: String, limit: u32 },

    /// Persisted data could not be opened or is inconsistent
    #[error("unable to load store '{name}': {reason}. Corrupt file or directory?")]
    Corrupt { name: String, reason: String },

    /// An owner id too large to address in the index
    #[error("owner {owner} is out of range (at most {limit})")]
    OwnerOutOfRange { owner: usize, limit: usize },

    /// An index entry refers to a value that does not exist
    #[error("store '{name}' has no value with id {id}")]
    UnknownId { name: String, id: u32 },

    /// copy_to between stores with different layouts
    #[error("cannot copy store '{from}' into '{to}': {reason}")]
    StorageMismatch {
        from: String,
        to: String,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
