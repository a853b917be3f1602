//! Offer listing.
//!
//! The stored `is_active` flag is not kept in step with the validity window
//! or the usage cap, so every listing re-checks both.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::OnError;
use crate::db::{OfferRepo, RepositoryError};
use crate::models::Offer;

/// Offers are core listings: store errors propagate.
pub const ON_ERROR: OnError = OnError::Fail;

impl Offer {
    /// Whether the offer can be redeemed at `now`.
    ///
    /// Bounds are strict: an offer ending or starting exactly at `now` is
    /// still redeemable. An offer whose uses reached its cap is not.
    #[must_use]
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        let ended = self.valid_to.is_some_and(|to| to < now);
        let not_started = self.valid_from.is_some_and(|from| from > now);
        let used_up = self.max_uses.is_some_and(|max| self.current_uses >= max);
        !(ended || not_started || used_up)
    }
}

/// Offers redeemable at `now`, newest first.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store))]
pub async fn active<S>(
    store: &S,
    now: DateTime<Utc>,
    on_error: OnError,
) -> Result<Vec<Offer>, RepositoryError>
where
    S: OfferRepo + ?Sized,
{
    let offers = on_error.apply("offers", store.active_offers().await)?;
    let total = offers.len();
    let redeemable: Vec<Offer> = offers
        .into_iter()
        .filter(|offer| offer.is_redeemable_at(now))
        .collect();

    if redeemable.len() < total {
        debug!(
            dropped = total - redeemable.len(),
            "Dropped flagged-active offers outside their window or cap"
        );
    }
    Ok(redeemable)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use fitova_core::OfferId;

    use super::*;
    use crate::db::{MemoryStore, memory::Operation};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn offer(title: &str) -> Offer {
        Offer {
            id: OfferId::generate(),
            title: title.to_owned(),
            description: None,
            code: Some("FIT10".to_owned()),
            discount_percent: Some(10),
            image_url: None,
            link_url: None,
            is_active: true,
            valid_from: None,
            valid_to: None,
            max_uses: None,
            current_uses: 0,
            created_at: now() - Duration::days(30),
        }
    }

    #[test]
    fn test_unbounded_offer_is_redeemable() {
        assert!(offer("open").is_redeemable_at(now()));
    }

    #[test]
    fn test_expired_offer_excluded() {
        let o = Offer {
            valid_to: Some(now() - Duration::seconds(1)),
            ..offer("expired")
        };
        assert!(!o.is_redeemable_at(now()));
    }

    #[test]
    fn test_future_offer_excluded() {
        let o = Offer {
            valid_from: Some(now() + Duration::seconds(1)),
            ..offer("future")
        };
        assert!(!o.is_redeemable_at(now()));
    }

    #[test]
    fn test_used_up_offer_excluded() {
        let o = Offer {
            max_uses: Some(5),
            current_uses: 5,
            ..offer("used up")
        };
        assert!(!o.is_redeemable_at(now()));

        let over = Offer {
            max_uses: Some(5),
            current_uses: 7,
            ..offer("over")
        };
        assert!(!over.is_redeemable_at(now()));
    }

    #[test]
    fn test_boundaries_equal_to_now_are_included() {
        let ends_now = Offer {
            valid_to: Some(now()),
            ..offer("ends now")
        };
        let starts_now = Offer {
            valid_from: Some(now()),
            ..offer("starts now")
        };
        let one_left = Offer {
            max_uses: Some(5),
            current_uses: 4,
            ..offer("one left")
        };

        assert!(ends_now.is_redeemable_at(now()));
        assert!(starts_now.is_redeemable_at(now()));
        assert!(one_left.is_redeemable_at(now()));
    }

    #[test]
    fn test_combined_conditions() {
        let in_window_but_used_up = Offer {
            valid_from: Some(now() - Duration::days(1)),
            valid_to: Some(now() + Duration::days(1)),
            max_uses: Some(1),
            current_uses: 1,
            ..offer("a")
        };
        let expired_and_used_up = Offer {
            valid_to: Some(now() - Duration::days(1)),
            max_uses: Some(1),
            current_uses: 1,
            ..offer("b")
        };
        let inverted_window = Offer {
            valid_from: Some(now() + Duration::days(1)),
            valid_to: Some(now() - Duration::days(1)),
            ..offer("c")
        };
        let all_within = Offer {
            valid_from: Some(now() - Duration::days(1)),
            valid_to: Some(now() + Duration::days(1)),
            max_uses: Some(10),
            current_uses: 3,
            ..offer("d")
        };

        assert!(!in_window_but_used_up.is_redeemable_at(now()));
        assert!(!expired_and_used_up.is_redeemable_at(now()));
        assert!(!inverted_window.is_redeemable_at(now()));
        assert!(all_within.is_redeemable_at(now()));
    }

    #[tokio::test]
    async fn test_active_filters_and_keeps_newest_first() {
        let store = MemoryStore::new();
        let older = Offer {
            created_at: now() - Duration::days(10),
            ..offer("older")
        };
        let newer = Offer {
            created_at: now() - Duration::days(1),
            ..offer("newer")
        };
        let expired = Offer {
            valid_to: Some(now() - Duration::hours(1)),
            ..offer("expired")
        };
        let flagged_off = Offer {
            is_active: false,
            ..offer("flagged off")
        };
        for o in [&older, &newer, &expired, &flagged_off] {
            store.seed_offer(o.clone()).await;
        }

        let rows = active(&store, now(), ON_ERROR).await.unwrap();

        let titles: Vec<_> = rows.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, ["newer", "older"]);
    }

    #[tokio::test]
    async fn test_active_failure_propagates() {
        let store = MemoryStore::new();
        store.fail(Operation::ActiveOffers);

        assert!(active(&store, now(), ON_ERROR).await.is_err());
    }
}
