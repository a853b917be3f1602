//! Offer repository.

use async_trait::async_trait;

use super::{PgStore, RepositoryError};
use crate::models::Offer;

/// Read access to promotional offers.
#[async_trait]
pub trait OfferRepo: Send + Sync {
    /// Offers flagged `is_active`, newest first.
    ///
    /// The flag alone is not trustworthy; callers re-check the validity
    /// window and usage cap.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn active_offers(&self) -> Result<Vec<Offer>, RepositoryError>;
}

#[async_trait]
impl OfferRepo for PgStore {
    async fn active_offers(&self) -> Result<Vec<Offer>, RepositoryError> {
        let rows = sqlx::query_as::<_, Offer>(
            r"
            SELECT id, title, description, code, discount_percent, image_url, link_url,
                   is_active, valid_from, valid_to, max_uses, current_uses, created_at
            FROM offers
            WHERE is_active
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
