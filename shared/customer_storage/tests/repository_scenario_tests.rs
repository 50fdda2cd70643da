//! Customer repository behaviour over the in-memory container

use customer_storage::container::{Container, InMemoryContainer};
use customer_storage::customer::{Customer, CustomerRepository};
use customer_storage::is_not_found;
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn ada() -> Customer {
    Customer {
        id: "c-001".to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        loyalty_tier: Some("gold".to_string()),
    }
}

fn repository() -> (CustomerRepository<InMemoryContainer>, InMemoryContainer) {
    let container = InMemoryContainer::new("customers").with_page_size(4);
    (CustomerRepository::new(container.clone()), container)
}

#[tokio::test]
async fn test_ada_lovelace_lifecycle() {
    let (repository, _) = repository();

    let stored = repository.create(&ada()).await.unwrap();
    assert_eq!(stored, ada());

    assert_eq!(repository.get_by_id("c-001").await.unwrap(), Some(ada()));

    let silver = Customer {
        loyalty_tier: Some("silver".to_string()),
        ..ada()
    };
    assert_eq!(repository.update(&silver).await.unwrap(), silver);

    let fetched = repository.get_by_id("c-001").await.unwrap().unwrap();
    assert_eq!(fetched.loyalty_tier.as_deref(), Some("silver"));

    repository.delete("c-001").await.unwrap();
    assert_eq!(repository.get_by_id("c-001").await.unwrap(), None);
}

#[tokio::test]
async fn test_round_trip_without_loyalty_tier() {
    let (repository, container) = repository();
    let customer = Customer {
        id: "c-501".to_string(),
        name: "Mary Jackson".to_string(),
        email: "mary@example.com".to_string(),
        loyalty_tier: None,
    };

    repository.create(&customer).await.unwrap();

    assert_eq!(
        repository.get_by_id(&customer.id).await.unwrap(),
        Some(customer.clone())
    );
    let document = container.get(&customer.id).await.unwrap();
    assert!(!document.contains_key("loyaltyTier"));
}

#[tokio::test]
async fn test_update_is_full_replace() {
    let (repository, _) = repository();
    repository.create(&ada()).await.unwrap();

    let replacement = Customer {
        id: "c-001".to_string(),
        name: "Augusta Ada King".to_string(),
        email: "countess@example.com".to_string(),
        loyalty_tier: None,
    };
    repository.update(&replacement).await.unwrap();

    assert_eq!(
        repository.get_by_id("c-001").await.unwrap(),
        Some(replacement)
    );
}

#[tokio::test]
async fn test_missing_customer_reads_as_none() {
    let (repository, _) = repository();

    assert_eq!(repository.get_by_id("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_update_and_delete_missing_are_errors() {
    let (repository, _) = repository();

    let err = repository.update(&ada()).await.unwrap_err();
    assert!(is_not_found(&err));

    let err = repository.delete("c-001").await.unwrap_err();
    assert!(is_not_found(&err));

    // Deleting twice fails the second time
    repository.create(&ada()).await.unwrap();
    repository.delete("c-001").await.unwrap();
    assert!(repository.delete("c-001").await.is_err());
}

#[tokio::test]
async fn test_duplicate_create_is_error() {
    let (repository, container) = repository();
    repository.create(&ada()).await.unwrap();

    let err = repository
        .create(&Customer {
            name: "Someone Else".to_string(),
            ..ada()
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(409));
    assert_eq!(container.get("c-001").await.unwrap()["name"], "Ada Lovelace");
}

#[tokio::test]
async fn test_list_returns_every_customer_across_pages() {
    let (repository, container) = repository();
    assert!(repository.list().await.unwrap().is_empty());

    let mut ids: Vec<String> = (0..17).map(|_| Uuid::new_v4().to_string()).collect();
    for id in &ids {
        repository
            .create(&Customer {
                id: id.clone(),
                name: "Listed".to_string(),
                email: "listed@example.com".to_string(),
                loyalty_tier: None,
            })
            .await
            .unwrap();
    }

    let mut listed: Vec<String> = repository
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|customer| customer.id)
        .collect();

    ids.sort();
    listed.sort();
    assert_eq!(listed, ids);
    assert_eq!(container.id(), "customers");
}
