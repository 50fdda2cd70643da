//! Container backed by a Dynamo DB table

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_dynamodb::{
    config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Credentials, Region},
    error::SdkError,
    types::AttributeValue,
    Client as DynamoDbClient,
};
use serde_json::Value;
use tracing::debug;

use super::{Container, Document, ItemAttribute, ItemKey, QueryPage};
use crate::config::ContainerConfig;
use crate::{StorageError, StorageResult};

/// Dynamo DB requires a signing region even when the endpoint is explicit
const DEFAULT_REGION: &str = "us-east-1";

/// Upper bound for a single operation, including connect time
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

const CREDENTIALS_PROVIDER: &str = "customer-storage-config";

/// Builds the container described by `config`
///
/// The client is bound to the configured endpoint and key. Nothing is sent over the network
/// here: an unreachable endpoint or a missing table surfaces on the first operation.
///
/// The key is `<access-key-id>:<secret-access-key>`. A key without a colon is used for both
/// halves, which is enough for `LocalStack` and Dynamo DB Local.
#[must_use]
pub fn create_container(config: &ContainerConfig) -> DynamoDbContainer {
    let (access_key_id, secret_access_key) = config
        .key
        .split_once(':')
        .unwrap_or((config.key.as_str(), config.key.as_str()));
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        CREDENTIALS_PROVIDER,
    );

    let sdk_config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(DEFAULT_REGION))
        .endpoint_url(&config.endpoint)
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(OPERATION_TIMEOUT)
                .build(),
        )
        .build();

    DynamoDbContainer::new(
        Arc::new(DynamoDbClient::from_conf(sdk_config)),
        table_name(&config.database_id, &config.container_id),
    )
}

/// Dynamo DB has no database tier, so the database id namespaces the table
fn table_name(database_id: &str, container_id: &str) -> String {
    format!("{database_id}-{container_id}")
}

/// Container client for Dynamo DB operations
pub struct DynamoDbContainer {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
}

impl DynamoDbContainer {
    /// Creates a new container client
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table holding the items, keyed by the `id` attribute
    #[must_use]
    pub const fn new(dynamodb_client: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self {
            dynamodb_client,
            table_name,
        }
    }

    /// The table is keyed by `id` alone, so only self-partitioned items are addressable
    fn key_value(key: &ItemKey) -> StorageResult<AttributeValue> {
        if key.partition_key != key.id {
            return Err(StorageError::bad_request(format!(
                "Partition key {} does not match item id {}",
                key.partition_key, key.id
            )));
        }

        Ok(AttributeValue::S(key.id.clone()))
    }
}

fn document_id(document: &Document) -> StorageResult<&str> {
    document
        .get(&ItemAttribute::Id.to_string())
        .and_then(Value::as_str)
        .ok_or_else(|| StorageError::bad_request("Document is missing a string id"))
}

#[async_trait::async_trait]
impl Container for DynamoDbContainer {
    fn id(&self) -> &str {
        &self.table_name
    }

    async fn create_item(&self, document: Document) -> StorageResult<Document> {
        let id = document_id(&document)?.to_string();
        let item = serde_dynamo::to_item(&document)?;

        debug!(table = %self.table_name, id = %id, "Creating item");

        // Create only if no item with this id exists
        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ItemAttribute::Id.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    StorageError::conflict(format!("Item already exists: {id}")).with_source(err)
                } else {
                    err.into()
                }
            })?;

        Ok(document)
    }

    async fn read_item(&self, key: &ItemKey) -> StorageResult<Option<Document>> {
        debug!(table = %self.table_name, id = %key.id, "Reading item");

        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(ItemAttribute::Id.to_string(), Self::key_value(key)?)
            .send()
            .await?;

        let document = response
            .item
            .map(serde_dynamo::from_item::<_, Document>)
            .transpose()?;

        Ok(document)
    }

    async fn replace_item(&self, key: &ItemKey, document: Document) -> StorageResult<Document> {
        Self::key_value(key)?;
        if document_id(&document)? != key.id {
            return Err(StorageError::bad_request(format!(
                "Document id does not match item id {}",
                key.id
            )));
        }
        let item = serde_dynamo::to_item(&document)?;

        debug!(table = %self.table_name, id = %key.id, "Replacing item");

        // Replace only if the item is already there
        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ItemAttribute::Id.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    StorageError::not_found(format!("Item not found: {}", key.id)).with_source(err)
                } else {
                    err.into()
                }
            })?;

        Ok(document)
    }

    async fn delete_item(&self, key: &ItemKey) -> StorageResult<()> {
        debug!(table = %self.table_name, id = %key.id, "Deleting item");

        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .key(ItemAttribute::Id.to_string(), Self::key_value(key)?)
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ItemAttribute::Id.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    StorageError::not_found(format!("Item not found: {}", key.id)).with_source(err)
                } else {
                    err.into()
                }
            })?;

        Ok(())
    }

    async fn query_items(
        &self,
        statement: &str,
        continuation: Option<String>,
    ) -> StorageResult<QueryPage> {
        debug!(
            table = %self.table_name,
            statement,
            has_continuation = continuation.is_some(),
            "Querying items"
        );

        let response = self
            .dynamodb_client
            .execute_statement()
            .statement(statement)
            .set_next_token(continuation)
            .send()
            .await?;

        let documents = serde_dynamo::from_items::<_, Document>(response.items.unwrap_or_default())?;

        Ok(QueryPage {
            documents,
            continuation: response.next_token,
        })
    }
}
