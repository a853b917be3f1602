//! Promotional offer type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fitova_core::OfferId;

/// A promotional offer (coupon code or partner deal).
///
/// The stored `is_active` flag is maintained by hand and drifts from the
/// validity window and usage cap, so listings re-check those fields; see
/// `services::offers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub discount_percent: Option<i32>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
    /// Start of the validity window; `None` means already started.
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window; `None` means open-ended.
    pub valid_to: Option<DateTime<Utc>>,
    /// Redemption cap; `None` means unlimited.
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub created_at: DateTime<Utc>,
}
