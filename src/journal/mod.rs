//! Journal Storage
//!
//! Journal entries and their persistence:
//!
//! - **entry**: `JournalEntry`, `EntryUpdate`, preview-text derivation
//! - **store**: `DocumentStore` trait (collection + document id addressing)
//! - **memory**: in-process store for development and tests
//! - **firestore**: Cloud Firestore REST store
//! - **repository**: CRUD gateway for entries on top of a store
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use freewrite::journal::{EntryUpdate, JournalRepository, MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = JournalRepository::with_store(Arc::new(MemoryStore::new()));
//!
//!     let entry = repo.create("Morning pages\nStill waking up").await?;
//!     assert_eq!(entry.preview_text, "Morning pages Still waking up");
//!
//!     repo.update(entry.id, EntryUpdate::content("Rewritten")).await?;
//!     let latest = repo.list(10, 0).await?;
//!     println!("{} entries", latest.len());
//!
//!     Ok(())
//! }
//! ```

pub mod entry;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod repository;
pub mod store;

pub use entry::{preview_text_for, EntryUpdate, JournalEntry, EMPTY_PREVIEW, PREVIEW_CHARS};
pub use error::{JournalError, JournalResult};
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;
pub use repository::{JournalRepository, DEFAULT_COLLECTION, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use store::{Document, DocumentStore, QueryOptions, SortDirection, StoreError, StoreResult};
