//! Profile repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fitova_core::UserId;

use super::{PgStore, RepositoryError};
use crate::models::{Profile, ProfileChanges};

/// Profile reads and self-service updates.
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    /// Fetch the profile keyed by `user`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    async fn profile(&self, user: UserId) -> Result<Option<Profile>, RepositoryError>;

    /// Apply `changes` and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile doesn't exist.
    async fn update_profile(
        &self,
        user: UserId,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Profile, RepositoryError>;

    /// Number of profiles (one per registered user).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the count fails.
    async fn count_profiles(&self) -> Result<i64, RepositoryError>;
}

const PROFILE_COLUMNS: &str =
    "id, email, full_name, phone, avatar_url, is_admin, created_at, updated_at";

#[async_trait]
impl ProfileRepo for PgStore {
    async fn profile(&self, user: UserId) -> Result<Option<Profile>, RepositoryError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user)
            .fetch_optional(self.pool())
            .await?;
        Ok(profile)
    }

    async fn update_profile(
        &self,
        user: UserId,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Profile, RepositoryError> {
        let sql = format!(
            r"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = $5
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(user)
            .bind(changes.full_name.as_deref())
            .bind(changes.phone.as_deref())
            .bind(changes.avatar_url.as_deref())
            .bind(updated_at)
            .fetch_optional(self.pool())
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn count_profiles(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
