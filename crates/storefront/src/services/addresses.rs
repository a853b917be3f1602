//! Owner-scoped address helpers.
//!
//! Every helper takes the caller's identity and never touches another
//! owner's rows.

use tracing::instrument;

use fitova_core::AddressId;

use super::OnError;
use crate::db::{AddressRepo, RepositoryError};
use crate::models::{Address, Identity, NewAddress};

/// Address listings are core data: store errors propagate by default.
pub const ON_ERROR: OnError = OnError::Fail;

/// The caller's addresses, default first, then newest.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store, owner), fields(user_id = %owner.id))]
pub async fn list<S>(
    store: &S,
    owner: &Identity,
    on_error: OnError,
) -> Result<Vec<Address>, RepositoryError>
where
    S: AddressRepo + ?Sized,
{
    on_error.apply("addresses", store.addresses(owner.id).await)
}

/// Add an address. A default address replaces the owner's previous default.
///
/// # Errors
///
/// Returns `RepositoryError` if the write fails.
#[instrument(skip(store, owner, address), fields(user_id = %owner.id))]
pub async fn add<S>(
    store: &S,
    owner: &Identity,
    address: &NewAddress,
) -> Result<Address, RepositoryError>
where
    S: AddressRepo + ?Sized,
{
    store.insert_address(owner.id, address).await
}

/// Replace an address's fields.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the caller owns no such address.
#[instrument(skip(store, owner, address), fields(user_id = %owner.id))]
pub async fn update<S>(
    store: &S,
    owner: &Identity,
    id: AddressId,
    address: &NewAddress,
) -> Result<Address, RepositoryError>
where
    S: AddressRepo + ?Sized,
{
    store
        .update_address(owner.id, id, address)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Delete an address.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the caller owns no such address.
#[instrument(skip(store, owner), fields(user_id = %owner.id))]
pub async fn remove<S>(store: &S, owner: &Identity, id: AddressId) -> Result<(), RepositoryError>
where
    S: AddressRepo + ?Sized,
{
    if store.delete_address(owner.id, id).await? {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

/// Make an address the caller's only default.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the caller owns no such address.
#[instrument(skip(store, owner), fields(user_id = %owner.id))]
pub async fn make_default<S>(
    store: &S,
    owner: &Identity,
    id: AddressId,
) -> Result<(), RepositoryError>
where
    S: AddressRepo + ?Sized,
{
    if store.set_default_address(owner.id, id).await? {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fitova_core::{Email, UserId};

    use super::*;
    use crate::db::{MemoryStore, memory::Operation};

    fn identity(email: &str) -> Identity {
        Identity {
            id: UserId::generate(),
            email: Email::parse(email).unwrap(),
        }
    }

    fn address(city: &str, is_default: bool) -> NewAddress {
        NewAddress {
            label: Some("Home".to_owned()),
            full_name: "Nour Adel".to_owned(),
            phone: None,
            line1: "12 Nile St".to_owned(),
            line2: None,
            city: city.to_owned(),
            state: None,
            postal_code: "11511".to_owned(),
            country: "EG".to_owned(),
            is_default,
        }
    }

    #[tokio::test]
    async fn test_new_default_replaces_old_default() {
        let store = MemoryStore::new();
        let owner = identity("nour@fitova.shop");
        let a = add(&store, &owner, &address("Cairo", true)).await.unwrap();
        let b = add(&store, &owner, &address("Giza", true)).await.unwrap();

        let rows = list(&store, &owner, ON_ERROR).await.unwrap();

        let defaults: Vec<_> = rows.iter().filter(|r| r.is_default).map(|r| r.id).collect();
        assert_eq!(defaults, vec![b.id]);
        assert_eq!(rows[0].id, b.id);
        assert!(rows.iter().any(|r| r.id == a.id));
    }

    #[tokio::test]
    async fn test_other_owner_cannot_delete() {
        let store = MemoryStore::new();
        let owner = identity("nour@fitova.shop");
        let other = identity("mallory@fitova.shop");
        let a = add(&store, &owner, &address("Cairo", false)).await.unwrap();

        let result = remove(&store, &other, a.id).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert_eq!(list(&store, &owner, ON_ERROR).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_make_default() {
        let store = MemoryStore::new();
        let owner = identity("nour@fitova.shop");
        let other = identity("mallory@fitova.shop");
        let a = add(&store, &owner, &address("Cairo", false)).await.unwrap();

        let result = make_default(&store, &other, a.id).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert!(!list(&store, &owner, ON_ERROR).await.unwrap()[0].is_default);
    }

    #[tokio::test]
    async fn test_update_unknown_address_is_not_found() {
        let store = MemoryStore::new();
        let owner = identity("nour@fitova.shop");

        let result = update(&store, &owner, AddressId::generate(), &address("Cairo", false)).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let store = MemoryStore::new();
        store.fail(Operation::Addresses);

        let result = list(&store, &identity("nour@fitova.shop"), ON_ERROR).await;

        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
    }
}
