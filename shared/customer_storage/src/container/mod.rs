//! Storage container capability
//!
//! A container is a logical collection inside the document database, addressed by a database id
//! and a container id. Items are unstructured JSON documents addressed by an id and a partition
//! key.

mod dynamodb;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

use serde_json::{Map, Value};
use strum::Display;

use crate::StorageResult;

pub use dynamodb::{create_container, DynamoDbContainer};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryContainer;

/// An unstructured stored document
pub type Document = Map<String, Value>;

/// Attributes every stored document carries
#[derive(Debug, Clone, Copy, Display)]
#[strum(serialize_all = "camelCase")]
pub enum ItemAttribute {
    /// Item id, also the key the item is stored under
    Id,
}

/// Address of a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    /// Item id
    pub id: String,
    /// Partition the item lives in
    pub partition_key: String,
}

impl ItemKey {
    /// Creates a key from an id and a partition key
    pub fn new(id: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            partition_key: partition_key.into(),
        }
    }

    /// Key for an item that is its own partition
    pub fn self_partitioned(id: &str) -> Self {
        Self::new(id, id)
    }
}

/// One page of query results
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    /// Documents in this page
    pub documents: Vec<Document>,
    /// Token for the next page, `None` on the last page
    pub continuation: Option<String>,
}

/// Item level point operations and queries on a single container
#[async_trait::async_trait]
pub trait Container: Send + Sync {
    /// Id of the container, usable as the collection name in query statements
    fn id(&self) -> &str;

    /// Stores a new document, failing if an item with the same id exists
    async fn create_item(&self, document: Document) -> StorageResult<Document>;

    /// Reads a document, returning `None` when the container reports it absent
    async fn read_item(&self, key: &ItemKey) -> StorageResult<Option<Document>>;

    /// Replaces an existing document in full
    async fn replace_item(&self, key: &ItemKey, document: Document) -> StorageResult<Document>;

    /// Deletes an existing document
    async fn delete_item(&self, key: &ItemKey) -> StorageResult<()>;

    /// Runs a query statement and returns the page following `continuation`
    async fn query_items(
        &self,
        statement: &str,
        continuation: Option<String>,
    ) -> StorageResult<QueryPage>;
}

/// Statement selecting every field of every item in the container named `container_id`
#[must_use]
pub fn select_all_statement(container_id: &str) -> String {
    format!(r#"SELECT * FROM "{container_id}""#)
}
