//! Profile helpers for the signed-in user.

use chrono::Utc;
use tracing::instrument;

use crate::db::{ProfileRepo, RepositoryError};
use crate::models::{Identity, Profile, ProfileChanges};

/// The caller's profile.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` when no profile row exists, or the
/// store error.
#[instrument(skip(store, owner), fields(user_id = %owner.id))]
pub async fn current<S>(store: &S, owner: &Identity) -> Result<Profile, RepositoryError>
where
    S: ProfileRepo + ?Sized,
{
    store
        .profile(owner.id)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Apply the caller's changes, stamping `updated_at` with the current time.
///
/// An empty change set still bumps `updated_at`.
///
/// # Errors
///
/// Returns `RepositoryError` if the update fails.
#[instrument(skip(store, owner, changes), fields(user_id = %owner.id))]
pub async fn update<S>(
    store: &S,
    owner: &Identity,
    changes: &ProfileChanges,
) -> Result<Profile, RepositoryError>
where
    S: ProfileRepo + ?Sized,
{
    store.update_profile(owner.id, changes, Utc::now()).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fitova_core::{Email, UserId};

    use super::*;
    use crate::db::{IdentityRepo, MemoryStore};

    #[tokio::test]
    async fn test_update_stamps_updated_at_and_keeps_untouched_fields() {
        let store = MemoryStore::new();
        let email = Email::parse("nour@fitova.shop").unwrap();
        let owner = store
            .create_identity(&email, "hash", Some("Nour"))
            .await
            .unwrap();
        let before = current(&store, &owner).await.unwrap();

        let changes = ProfileChanges {
            phone: Some("+20 100 000 0000".to_owned()),
            ..ProfileChanges::default()
        };
        let after = update(&store, &owner, &changes).await.unwrap();

        assert_eq!(after.full_name.as_deref(), Some("Nour"));
        assert_eq!(after.phone.as_deref(), Some("+20 100 000 0000"));
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let store = MemoryStore::new();
        let ghost = Identity {
            id: UserId::generate(),
            email: Email::parse("ghost@fitova.shop").unwrap(),
        };

        assert!(matches!(
            current(&store, &ghost).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            update(&store, &ghost, &ProfileChanges::default()).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
