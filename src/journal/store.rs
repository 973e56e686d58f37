//! Document store abstraction
//!
//! A document store addresses JSON documents by collection name and
//! document id. Journal persistence is written against this trait so the
//! backing database can be swapped (Firestore in production, in-memory for
//! development and tests).

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document: a JSON object keyed by field name
pub type Document = Map<String, Value>;

/// Common trait for document store backends
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for health reporting
    fn name(&self) -> &str;

    /// Fetch a document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Create or replace a document
    async fn set(&self, collection: &str, id: &str, document: Document) -> StoreResult<()>;

    /// Overwrite the given fields of an existing document
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn update(&self, collection: &str, id: &str, document: Document) -> StoreResult<()>;

    /// Remove a document. Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Fetch an ordered page of documents
    async fn query(&self, collection: &str, options: &QueryOptions) -> StoreResult<Vec<Document>>;
}

/// Sort direction for ordered queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordering and pagination for [`DocumentStore::query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Field to order by
    pub order_by: String,
    pub direction: SortDirection,
    /// Maximum number of documents to return
    pub limit: usize,
    /// Number of documents to skip
    pub offset: usize,
}

impl QueryOptions {
    /// Order by a field, newest/largest first
    pub fn descending(order_by: impl Into<String>) -> Self {
        Self {
            order_by: order_by.into(),
            direction: SortDirection::Descending,
            limit: 100,
            offset: 0,
        }
    }

    /// Order by a field, oldest/smallest first
    pub fn ascending(order_by: impl Into<String>) -> Self {
        Self {
            direction: SortDirection::Ascending,
            ..Self::descending(order_by)
        }
    }

    /// Builder method: set page size
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Builder method: set page offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Errors that can occur in a document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Document to update does not exist
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Transport failure talking to the backend
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend rejected the request
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Backend returned something we could not decode
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
