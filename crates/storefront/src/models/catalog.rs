//! Catalog domain types: categories and affiliate products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fitova_core::{CategoryId, Price, ProductId};

/// A product category shown in navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// An affiliate product.
///
/// Fitova does not sell the product itself: `affiliate_url` points at the
/// partner shop and outbound clicks are counted in `click_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub price: Price,
    pub original_price: Option<Price>,
    pub image_url: Option<String>,
    pub affiliate_url: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Percentage off the original price, when the product is on sale.
    #[must_use]
    pub fn percent_off(&self) -> Option<u32> {
        self.original_price
            .as_ref()
            .and_then(|original| self.price.percent_off(original))
    }
}

/// Filter for plain product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Only featured products.
    pub featured_only: bool,
    /// Maximum rows returned.
    pub limit: Option<i64>,
}

/// Ranking procedures the store exposes.
///
/// Each returns an ordered list of bare product ids; full rows are fetched
/// separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductRanking {
    /// Most outbound clicks in the recent window.
    Trending,
    /// Most units in completed orders.
    BestSellers,
}

impl ProductRanking {
    /// Name of the stored procedure backing this ranking.
    #[must_use]
    pub const fn procedure(self) -> &'static str {
        match self {
            Self::Trending => "get_trending_products",
            Self::BestSellers => "get_best_selling_products",
        }
    }
}
