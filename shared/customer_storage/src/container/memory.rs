//! In-memory container used by tests
//!
//! Items are partitioned by their own id. Query results are ordered by id and split into pages
//! of `page_size`, the continuation token being the last id of the previous page.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use super::{select_all_statement, Container, Document, ItemAttribute, ItemKey, QueryPage};
use crate::{StorageError, StorageResult};

const DEFAULT_PAGE_SIZE: usize = 100;

/// Container keeping documents in a shared ordered map
///
/// Clones share the same items, so a test can keep a handle while a repository owns another.
#[derive(Debug, Clone)]
pub struct InMemoryContainer {
    id: String,
    page_size: usize,
    items: Arc<Mutex<BTreeMap<String, Document>>>,
}

impl InMemoryContainer {
    /// Creates an empty container
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            items: Arc::default(),
        }
    }

    /// Sets how many documents a query page holds (at least one)
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Whether the container holds no documents
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Stored document for `id`, bypassing the container operations
    pub async fn get(&self, id: &str) -> Option<Document> {
        self.items.lock().await.get(id).cloned()
    }
}

/// Items are partitioned by their own id, so any other partition key is rejected
fn check_partition(key: &ItemKey) -> StorageResult<()> {
    if key.partition_key != key.id {
        return Err(StorageError::bad_request(format!(
            "Partition key {} does not match item id {}",
            key.partition_key, key.id
        )));
    }

    Ok(())
}

fn document_id(document: &Document) -> StorageResult<String> {
    document
        .get(&ItemAttribute::Id.to_string())
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| StorageError::bad_request("Document is missing a string id"))
}

#[async_trait::async_trait]
impl Container for InMemoryContainer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn create_item(&self, document: Document) -> StorageResult<Document> {
        let id = document_id(&document)?;
        let mut items = self.items.lock().await;

        if items.contains_key(&id) {
            return Err(StorageError::conflict(format!("Item already exists: {id}")));
        }
        items.insert(id, document.clone());

        Ok(document)
    }

    async fn read_item(&self, key: &ItemKey) -> StorageResult<Option<Document>> {
        check_partition(key)?;

        Ok(self.items.lock().await.get(&key.id).cloned())
    }

    async fn replace_item(&self, key: &ItemKey, document: Document) -> StorageResult<Document> {
        check_partition(key)?;
        if document_id(&document)? != key.id {
            return Err(StorageError::bad_request(format!(
                "Document id does not match item id {}",
                key.id
            )));
        }

        let mut items = self.items.lock().await;
        match items.get_mut(&key.id) {
            Some(stored) => {
                stored.clone_from(&document);
                Ok(document)
            }
            None => Err(StorageError::not_found(format!("Item not found: {}", key.id))),
        }
    }

    async fn delete_item(&self, key: &ItemKey) -> StorageResult<()> {
        check_partition(key)?;
        let mut items = self.items.lock().await;

        if items.remove(&key.id).is_none() {
            return Err(StorageError::not_found(format!("Item not found: {}", key.id)));
        }

        Ok(())
    }

    async fn query_items(
        &self,
        statement: &str,
        continuation: Option<String>,
    ) -> StorageResult<QueryPage> {
        if statement != select_all_statement(&self.id) {
            return Err(StorageError::bad_request(format!(
                "Unsupported statement: {statement}"
            )));
        }

        let items = self.items.lock().await;
        let lower = continuation.map_or(Bound::Unbounded, Bound::Excluded);
        let mut remaining = items.range((lower, Bound::Unbounded));

        let documents: Vec<Document> = remaining
            .by_ref()
            .take(self.page_size)
            .map(|(_, document)| document.clone())
            .collect();

        let continuation = if remaining.next().is_some() {
            documents
                .last()
                .and_then(|document| document.get(&ItemAttribute::Id.to_string()))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        } else {
            None
        };

        Ok(QueryPage {
            documents,
            continuation,
        })
    }
}
