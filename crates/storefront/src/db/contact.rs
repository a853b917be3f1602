//! Contact message repository.

use async_trait::async_trait;

use super::{PgStore, RepositoryError};
use crate::models::{ContactMessage, NewContactMessage};

/// Contact form persistence.
#[async_trait]
pub trait ContactRepo: Send + Sync {
    /// Store a submitted message and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    async fn insert_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, RepositoryError>;
}

#[async_trait]
impl ContactRepo for PgStore {
    async fn insert_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, subject, message, is_read, created_at
            ",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(message.subject.as_deref())
        .bind(&message.message)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }
}
