//! Identity repository: sign-up and credential lookup.

use async_trait::async_trait;

use fitova_core::{Email, UserId};

use super::{PgStore, RepositoryError, conflict_or_database};
use crate::models::Identity;

/// Identity operations backing sign-in.
#[async_trait]
pub trait IdentityRepo: Send + Sync {
    /// Create an identity together with its (non-admin) profile row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn create_identity(
        &self,
        email: &Email,
        password_hash: &str,
        full_name: Option<&str>,
    ) -> Result<Identity, RepositoryError>;

    /// Look up an identity and its password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    async fn credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(Identity, String)>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: UserId,
    email: Email,
    password_hash: String,
}

#[async_trait]
impl IdentityRepo for PgStore {
    async fn create_identity(
        &self,
        email: &Email,
        password_hash: &str,
        full_name: Option<&str>,
    ) -> Result<Identity, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let id: UserId = sqlx::query_scalar(
            r"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_or_database(e, "email"))?;

        sqlx::query(
            r"
            INSERT INTO profiles (id, email, full_name)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Identity {
            id,
            email: email.clone(),
        })
    }

    async fn credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(Identity, String)>, RepositoryError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            r"
            SELECT id, email, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|r| {
            (
                Identity {
                    id: r.id,
                    email: r.email,
                },
                r.password_hash,
            )
        }))
    }
}
