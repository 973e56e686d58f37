//! Journal repository
//!
//! CRUD for journal entries on top of an injected [`DocumentStore`]. Entries
//! live in a single collection keyed by their UUID.
//!
//! Every operation fails with [`JournalError::StorageUnavailable`] when no
//! store is configured; callers decide how to degrade.

use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::entry::{EntryUpdate, JournalEntry};
use super::error::{JournalError, JournalResult};
use super::store::{Document, DocumentStore, QueryOptions};

/// Default collection for journal entries
pub const DEFAULT_COLLECTION: &str = "journals";

/// Smallest page `list` will return
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest page `list` will return
pub const MAX_PAGE_SIZE: usize = 1000;

/// Field entries are ordered by in `list`
const ORDER_FIELD: &str = "timestamp";

/// Persistence gateway for journal entries
pub struct JournalRepository {
    store: Option<Arc<dyn DocumentStore>>,
    collection: String,
}

impl JournalRepository {
    /// Create a repository over the given store (or none)
    pub fn new(store: Option<Arc<dyn DocumentStore>>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Create a repository using the default collection
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(Some(store), DEFAULT_COLLECTION)
    }

    /// Create a repository with no backing store
    pub fn unconfigured() -> Self {
        Self::new(None, DEFAULT_COLLECTION)
    }

    /// Check if a document store is configured
    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Name of the backing store, if any
    pub fn backend_name(&self) -> Option<&str> {
        self.store.as_deref().map(|store| store.name())
    }

    /// Collection entries are stored in
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn store(&self) -> JournalResult<&dyn DocumentStore> {
        self.store
            .as_deref()
            .ok_or(JournalError::StorageUnavailable)
    }

    /// Create and persist a new entry
    pub async fn create(&self, content: impl Into<String>) -> JournalResult<JournalEntry> {
        let store = self.store()?;
        let entry = JournalEntry::new(content);

        store
            .set(&self.collection, &entry.id.to_string(), encode_entry(&entry)?)
            .await?;

        tracing::info!(entry_id = %entry.id, filename = %entry.filename, "Created journal entry");
        Ok(entry)
    }

    /// Fetch an entry by id, `None` if it does not exist
    pub async fn get(&self, id: Uuid) -> JournalResult<Option<JournalEntry>> {
        let store = self.store()?;
        let key = id.to_string();

        match store.get(&self.collection, &key).await? {
            Some(document) => decode_entry(&key, document).map(Some),
            None => Ok(None),
        }
    }

    /// List entries, newest first.
    ///
    /// `limit` is clamped to [`MIN_PAGE_SIZE`]..=[`MAX_PAGE_SIZE`]. Records
    /// that fail to decode are skipped.
    pub async fn list(&self, limit: usize, offset: usize) -> JournalResult<Vec<JournalEntry>> {
        let store = self.store()?;
        let limit = limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        let options = QueryOptions::descending(ORDER_FIELD)
            .limit(limit)
            .offset(offset);
        let documents = store.query(&self.collection, &options).await?;

        let entries: Vec<JournalEntry> = documents
            .into_iter()
            .filter_map(|document| {
                let key = document_id(&document);
                match decode_entry(&key, document) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(entry_id = %key, error = %e, "Skipping unreadable journal entry");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(limit, offset, returned = entries.len(), "Listed journal entries");
        Ok(entries)
    }

    /// Apply a partial update, `None` if the entry does not exist
    pub async fn update(
        &self,
        id: Uuid,
        update: EntryUpdate,
    ) -> JournalResult<Option<JournalEntry>> {
        let store = self.store()?;
        let key = id.to_string();

        let Some(document) = store.get(&self.collection, &key).await? else {
            return Ok(None);
        };
        let mut entry = decode_entry(&key, document)?;

        if !entry.apply(update) {
            return Ok(Some(entry));
        }

        store
            .update(&self.collection, &key, encode_entry(&entry)?)
            .await?;

        tracing::info!(entry_id = %entry.id, "Updated journal entry");
        Ok(Some(entry))
    }

    /// Delete an entry. Returns `false` if it did not exist.
    pub async fn delete(&self, id: Uuid) -> JournalResult<bool> {
        let store = self.store()?;
        let key = id.to_string();

        if store.get(&self.collection, &key).await?.is_none() {
            return Ok(false);
        }

        store.delete(&self.collection, &key).await?;

        tracing::info!(entry_id = %key, "Deleted journal entry");
        Ok(true)
    }
}

fn encode_entry(entry: &JournalEntry) -> JournalResult<Document> {
    match serde_json::to_value(entry) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(JournalError::Encode {
            id: entry.id.to_string(),
            reason: "entry did not serialize to an object".to_string(),
        }),
        Err(e) => Err(JournalError::Encode {
            id: entry.id.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn decode_entry(key: &str, document: Document) -> JournalResult<JournalEntry> {
    let mut entry: JournalEntry =
        serde_json::from_value(Value::Object(document)).map_err(|e| JournalError::Corrupt {
            id: key.to_string(),
            reason: e.to_string(),
        })?;

    // Older records may lack a preview
    if entry.preview_text.is_empty() {
        entry.update_preview_text();
    }
    Ok(entry)
}

fn document_id(document: &Document) -> String {
    document
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::entry::EMPTY_PREVIEW;
    use crate::journal::memory::MemoryStore;
    use serde_json::json;

    fn repository() -> (JournalRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let repo = JournalRepository::with_store(store.clone());
        (repo, store)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (repo, _) = repository();

        let created = repo.create("Hello\nworld").await.unwrap();
        assert_eq!(created.preview_text, "Hello world");

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, created.content);
        assert_eq!(fetched.date, created.date);
        assert_eq!(fetched.filename, created.filename);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (repo, _) = repository();
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_empty_content() {
        let (repo, _) = repository();
        let created = repo.create("").await.unwrap();
        assert_eq!(created.preview_text, EMPTY_PREVIEW);
    }

    #[tokio::test]
    async fn test_update_content_only() {
        let (repo, _) = repository();
        let created = repo.create("short").await.unwrap();

        let long = "a".repeat(60);
        let updated = repo
            .update(created.id, EntryUpdate::content(long.clone()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.content, long);
        assert_eq!(updated.preview_text, format!("{}...", "a".repeat(50)));
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.filename, created.filename);
        assert_eq!(updated.timestamp, created.timestamp);

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_without_fields_keeps_entry() {
        let (repo, _) = repository();
        let created = repo.create("keep me").await.unwrap();

        let updated = repo
            .update(created.id, EntryUpdate::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn test_update_missing_is_none() {
        let (repo, _) = repository();
        let result = repo
            .update(Uuid::new_v4(), EntryUpdate::content("x"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, store) = repository();
        let created = repo.create("to delete").await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
        assert_eq!(store.len(DEFAULT_COLLECTION).await, 0);

        assert!(!repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (repo, _) = repository();
        let entries = repo.list(1000, 0).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let (repo, _) = repository();
        let mut created = Vec::new();
        for i in 0..3 {
            created.push(repo.create(format!("entry {}", i)).await.unwrap());
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let entries = repo.list(100, 0).await.unwrap();
        let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![created[2].id, created[1].id, created[0].id]);

        let page = repo.list(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, created[1].id);

        // limit below the minimum is clamped up
        assert_eq!(repo.list(0, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_records() {
        let (repo, store) = repository();
        let good = repo.create("fine").await.unwrap();

        let Value::Object(bad) = json!({"id": "broken", "timestamp": "2000-01-01T00:00:00.000000Z"}) else {
            unreachable!()
        };
        store.set(DEFAULT_COLLECTION, "broken", bad).await.unwrap();

        let entries = repo.list(10, 0).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, good.id);
    }

    #[tokio::test]
    async fn test_reads_records_with_naive_timestamps() {
        let (repo, store) = repository();
        let id = Uuid::new_v4();

        let Value::Object(legacy) = json!({
            "id": id.to_string(),
            "content": "Hello\nagain",
            "preview_text": null,
            "date": "Mar 07",
            "filename": "[2024-03-07-09-05-30].md",
            "timestamp": "2024-03-07T09:05:30.123456",
        }) else {
            unreachable!()
        };
        store.set(DEFAULT_COLLECTION, &id.to_string(), legacy).await.unwrap();
        let newer = repo.create("newer").await.unwrap();

        let fetched = repo.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.preview_text, "Hello again");

        let entries = repo.list(10, 0).await.unwrap();
        let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newer.id, id]);

        let updated = repo
            .update(id, EntryUpdate::content("edited"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.preview_text, "edited");
        assert_eq!(updated.timestamp, fetched.timestamp);
    }

    #[tokio::test]
    async fn test_unconfigured_store_fails_every_operation() {
        let repo = JournalRepository::unconfigured();
        let id = Uuid::new_v4();

        assert!(!repo.is_configured());
        assert!(repo.backend_name().is_none());
        assert!(matches!(
            repo.create("x").await,
            Err(JournalError::StorageUnavailable)
        ));
        assert!(matches!(repo.get(id).await, Err(JournalError::StorageUnavailable)));
        assert!(matches!(
            repo.list(10, 0).await,
            Err(JournalError::StorageUnavailable)
        ));
        assert!(matches!(
            repo.update(id, EntryUpdate::content("x")).await,
            Err(JournalError::StorageUnavailable)
        ));
        assert!(matches!(
            repo.delete(id).await,
            Err(JournalError::StorageUnavailable)
        ));
    }

    #[test]
    fn test_backend_name() {
        let (repo, _) = repository();
        assert_eq!(repo.backend_name(), Some("memory"));
        assert_eq!(repo.collection(), DEFAULT_COLLECTION);
    }
}
