//! Per-call customer operations
//!
//! Every call builds its own chain: configuration is loaded from the given source, a container
//! is created from it and a repository is wrapped around the container. Nothing is shared
//! between calls.

use customer_storage::config::{load_config, ConfigSource, ContainerConfig, ProcessEnv};
use customer_storage::container::{create_container, Container, DynamoDbContainer};
use customer_storage::customer::{Customer, CustomerRepository};
use tracing::debug;

use crate::types::AppResult;

/// Builds the container a repository is wrapped around
pub trait ContainerFactory: Send + Sync {
    /// Container type produced by this factory
    type Container: Container;

    /// Creates a container for `config`
    fn create_container(&self, config: &ContainerConfig) -> Self::Container;
}

/// Factory for Dynamo DB backed containers
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamoDbContainerFactory;

impl ContainerFactory for DynamoDbContainerFactory {
    type Container = DynamoDbContainer;

    fn create_container(&self, config: &ContainerConfig) -> DynamoDbContainer {
        create_container(config)
    }
}

/// The customer stored by [`CustomerApp::store_sample_customer`]
#[must_use]
pub fn sample_customer() -> Customer {
    Customer {
        id: "c-001".to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        loyalty_tier: Some("gold".to_string()),
    }
}

/// Customer operations wired from a configuration source
#[derive(Debug, Clone, Default)]
pub struct CustomerApp<F = DynamoDbContainerFactory> {
    factory: F,
}

impl<F: ContainerFactory> CustomerApp<F> {
    /// Creates the helpers around `factory`
    #[must_use]
    pub const fn new(factory: F) -> Self {
        Self { factory }
    }

    fn build_repository<S: ConfigSource + Sync + ?Sized>(
        &self,
        source: &S,
    ) -> AppResult<CustomerRepository<F::Container>> {
        let config = load_config(source)?;
        debug!(
            database_id = %config.database_id,
            container_id = %config.container_id,
            "Building customer repository"
        );

        Ok(CustomerRepository::new(
            self.factory.create_container(&config),
        ))
    }

    /// Creates a customer
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `source` is incomplete, or `AppError::Storage` if the
    /// container rejects the write
    pub async fn create_customer<S: ConfigSource + Sync + ?Sized>(
        &self,
        customer: &Customer,
        source: &S,
    ) -> AppResult<Customer> {
        let repository = self.build_repository(source)?;
        Ok(repository.create(customer).await?)
    }

    /// Gets a customer by id, `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `source` is incomplete, or `AppError::Storage` for any
    /// storage failure other than not found
    pub async fn get_customer_by_id<S: ConfigSource + Sync + ?Sized>(
        &self,
        id: &str,
        source: &S,
    ) -> AppResult<Option<Customer>> {
        let repository = self.build_repository(source)?;
        Ok(repository.get_by_id(id).await?)
    }

    /// Replaces a customer in full
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `source` is incomplete, or `AppError::Storage` if the
    /// replace fails, including when the customer does not exist
    pub async fn update_customer<S: ConfigSource + Sync + ?Sized>(
        &self,
        customer: &Customer,
        source: &S,
    ) -> AppResult<Customer> {
        let repository = self.build_repository(source)?;
        Ok(repository.update(customer).await?)
    }

    /// Deletes a customer
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `source` is incomplete, or `AppError::Storage` if the
    /// delete fails, including when the customer does not exist
    pub async fn delete_customer<S: ConfigSource + Sync + ?Sized>(
        &self,
        id: &str,
        source: &S,
    ) -> AppResult<()> {
        let repository = self.build_repository(source)?;
        Ok(repository.delete(id).await?)
    }

    /// Lists every customer
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `source` is incomplete, or `AppError::Storage` if the
    /// query fails
    pub async fn list_customers<S: ConfigSource + Sync + ?Sized>(
        &self,
        source: &S,
    ) -> AppResult<Vec<Customer>> {
        let repository = self.build_repository(source)?;
        Ok(repository.list().await?)
    }

    /// Stores [`sample_customer`]
    ///
    /// # Errors
    ///
    /// Same as [`CustomerApp::create_customer`]
    pub async fn store_sample_customer<S: ConfigSource + Sync + ?Sized>(
        &self,
        source: &S,
    ) -> AppResult<Customer> {
        self.create_customer(&sample_customer(), source).await
    }
}

/// Creates a customer using the process environment
///
/// # Errors
///
/// See [`CustomerApp::create_customer`]
pub async fn create_customer(customer: &Customer) -> AppResult<Customer> {
    CustomerApp::new(DynamoDbContainerFactory)
        .create_customer(customer, &ProcessEnv)
        .await
}

/// Gets a customer by id using the process environment
///
/// # Errors
///
/// See [`CustomerApp::get_customer_by_id`]
pub async fn get_customer_by_id(id: &str) -> AppResult<Option<Customer>> {
    CustomerApp::new(DynamoDbContainerFactory)
        .get_customer_by_id(id, &ProcessEnv)
        .await
}

/// Replaces a customer using the process environment
///
/// # Errors
///
/// See [`CustomerApp::update_customer`]
pub async fn update_customer(customer: &Customer) -> AppResult<Customer> {
    CustomerApp::new(DynamoDbContainerFactory)
        .update_customer(customer, &ProcessEnv)
        .await
}

/// Deletes a customer using the process environment
///
/// # Errors
///
/// See [`CustomerApp::delete_customer`]
pub async fn delete_customer(id: &str) -> AppResult<()> {
    CustomerApp::new(DynamoDbContainerFactory)
        .delete_customer(id, &ProcessEnv)
        .await
}

/// Lists every customer using the process environment
///
/// # Errors
///
/// See [`CustomerApp::list_customers`]
pub async fn list_customers() -> AppResult<Vec<Customer>> {
    CustomerApp::new(DynamoDbContainerFactory).list_customers(&ProcessEnv).await
}

/// Stores the sample customer using the process environment
///
/// # Errors
///
/// See [`CustomerApp::store_sample_customer`]
pub async fn store_sample_customer() -> AppResult<Customer> {
    CustomerApp::new(DynamoDbContainerFactory)
        .store_sample_customer(&ProcessEnv)
        .await
}
