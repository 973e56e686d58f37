//! Journal persistence error types

use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur in the journal repository
#[derive(Error, Debug)]
pub enum JournalError {
    /// No document store is configured
    #[error("Storage unavailable: no document store configured")]
    StorageUnavailable,

    /// The document store failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A stored record could not be decoded as a journal entry
    #[error("Corrupt journal entry {id}: {reason}")]
    Corrupt { id: String, reason: String },

    /// An entry could not be encoded as a document
    #[error("Failed to encode journal entry {id}: {reason}")]
    Encode { id: String, reason: String },
}

/// Result type alias for journal operations
pub type JournalResult<T> = Result<T, JournalError>;
