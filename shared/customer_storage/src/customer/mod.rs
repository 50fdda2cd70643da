//! Customer repository
//!
//! Translates customer operations into item and query operations on a single container. The
//! repository holds nothing but the container and never caches or retries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::container::{select_all_statement, Container, Document, ItemKey};
use crate::{is_not_found, StorageError, StorageResult};

/// Customer document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique id, immutable once created
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Loyalty tier, left out of the stored document when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty_tier: Option<String>,
}

impl Customer {
    fn to_document(&self) -> StorageResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(document) => Ok(document),
            _ => Err(StorageError::new("Customer did not serialize to a document")),
        }
    }

    fn from_document(document: Document) -> StorageResult<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}

/// Repository for customers stored in a container
pub struct CustomerRepository<C> {
    container: C,
}

impl<C: Container> CustomerRepository<C> {
    /// Creates a repository that owns `container` for its whole lifetime
    #[must_use]
    pub const fn new(container: C) -> Self {
        Self { container }
    }

    /// Stores a new customer and returns the stored representation
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the container rejects the write, for example because a
    /// customer with the same id already exists
    pub async fn create(&self, customer: &Customer) -> StorageResult<Customer> {
        let stored = self.container.create_item(customer.to_document()?).await?;
        Customer::from_document(stored)
    }

    /// Gets a customer by id
    ///
    /// A missing customer is a normal outcome and yields `None`, whether the container reports
    /// it as an absent item or as a not found error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for any failure other than not found
    pub async fn get_by_id(&self, id: &str) -> StorageResult<Option<Customer>> {
        match self
            .container
            .read_item(&ItemKey::self_partitioned(id))
            .await
        {
            Ok(document) => document.map(Customer::from_document).transpose(),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Replaces a customer in full
    ///
    /// Fields left unset on `customer` are removed from the stored document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the replace fails, including when no customer with this id
    /// exists
    pub async fn update(&self, customer: &Customer) -> StorageResult<Customer> {
        let stored = self
            .container
            .replace_item(
                &ItemKey::self_partitioned(&customer.id),
                customer.to_document()?,
            )
            .await?;
        Customer::from_document(stored)
    }

    /// Deletes a customer by id
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails, including when no customer with this id
    /// exists
    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.container
            .delete_item(&ItemKey::self_partitioned(id))
            .await
    }

    /// Lists every customer in the container
    ///
    /// All result pages are fetched before returning.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any page of the query fails
    pub async fn list(&self) -> StorageResult<Vec<Customer>> {
        let statement = select_all_statement(self.container.id());
        let mut customers = Vec::new();
        let mut continuation = None;

        loop {
            let page = self
                .container
                .query_items(&statement, continuation)
                .await?;

            for document in page.documents {
                customers.push(Customer::from_document(document)?);
            }

            continuation = page.continuation;
            if continuation.is_none() {
                break;
            }
        }

        Ok(customers)
    }
}
