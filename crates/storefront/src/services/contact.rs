//! Contact form submissions.

use tracing::{info, instrument};

use crate::db::{ContactRepo, RepositoryError};
use crate::models::{ContactMessage, NewContactMessage};

/// Store a validated contact message.
///
/// # Errors
///
/// Returns `RepositoryError` if the insert fails.
#[instrument(skip(store, message), fields(email = %message.email))]
pub async fn submit<S>(
    store: &S,
    message: &NewContactMessage,
) -> Result<ContactMessage, RepositoryError>
where
    S: ContactRepo + ?Sized,
{
    let row = store.insert_contact_message(message).await?;
    info!(message_id = %row.id, "Contact message received");
    Ok(row)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fitova_core::Email;

    use super::*;
    use crate::db::{MemoryStore, memory::Operation};

    fn message() -> NewContactMessage {
        NewContactMessage {
            name: "Salma".to_owned(),
            email: Email::parse("salma@example.com").unwrap(),
            subject: Some("Sizing".to_owned()),
            message: "Does the linen shirt run small?".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_submit_returns_stored_row() {
        let store = MemoryStore::new();

        let row = submit(&store, &message()).await.unwrap();

        assert!(!row.is_read);
        assert_eq!(row.subject.as_deref(), Some("Sizing"));
        assert_eq!(store.contact_messages().await, vec![row]);
    }

    #[tokio::test]
    async fn test_submit_failure_propagates() {
        let store = MemoryStore::new();
        store.fail(Operation::InsertContactMessage);

        assert!(submit(&store, &message()).await.is_err());
        assert!(store.contact_messages().await.is_empty());
    }
}
