//! Public catalog and marketing content handlers.

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use fitova_core::CategoryId;

use super::{ApiData, ApiPath, ApiQuery, LimitQuery};
use crate::error::Result;
use crate::models::{
    Category, HomepageSlide, Offer, Product, ProductQuery, ProductRanking, Testimonial,
};
use crate::services::{catalog, content, offers};
use crate::state::AppState;

/// Query parameters for `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub featured: bool,
    pub limit: Option<i64>,
}

/// Active categories.
///
/// GET /api/categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<ApiData<Vec<Category>>> {
    let rows = catalog::categories(state.store(), catalog::CATEGORIES_ON_ERROR).await?;
    Ok(ApiData::new(rows))
}

/// Offers that can be redeemed right now.
///
/// GET /api/offers
#[instrument(skip(state))]
pub async fn offers(State(state): State<AppState>) -> Result<ApiData<Vec<Offer>>> {
    let rows = offers::active(state.store(), Utc::now(), offers::ON_ERROR).await?;
    Ok(ApiData::new(rows))
}

/// Visible testimonials.
///
/// GET /api/testimonials?limit=
#[instrument(skip(state))]
pub async fn testimonials(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<ApiData<Vec<Testimonial>>> {
    let limit = query.limit.map(|l| l.clamp(1, catalog::MAX_LIMIT));
    let rows = content::testimonials(state.store(), limit, content::ON_ERROR).await?;
    Ok(ApiData::new(rows))
}

/// Active homepage slides.
///
/// GET /api/homepage-slides
#[instrument(skip(state))]
pub async fn homepage_slides(
    State(state): State<AppState>,
) -> Result<ApiData<Vec<HomepageSlide>>> {
    let rows = content::slides(state.store(), true, content::ON_ERROR).await?;
    Ok(ApiData::new(rows))
}

/// Active products, optionally filtered.
///
/// GET /api/products?category=&featured=&limit=
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductsQuery>,
) -> Result<ApiData<Vec<Product>>> {
    let query = ProductQuery {
        category_id: query.category,
        featured_only: query.featured,
        limit: query.limit.map(|l| l.clamp(1, catalog::MAX_LIMIT)),
    };
    let rows = catalog::products(state.store(), &query).await?;
    Ok(ApiData::new(rows))
}

/// One product by slug.
///
/// GET /api/products/{slug}
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<ApiData<Product>> {
    let row = catalog::product(state.store(), &slug).await?;
    Ok(ApiData::new(row))
}

/// Most clicked products.
///
/// GET /api/products/trending?limit=
#[instrument(skip(state))]
pub async fn trending(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<ApiData<Vec<Product>>> {
    ranked(&state, ProductRanking::Trending, query.limit).await
}

/// Best selling products.
///
/// GET /api/products/best-sellers?limit=
#[instrument(skip(state))]
pub async fn best_sellers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<ApiData<Vec<Product>>> {
    ranked(&state, ProductRanking::BestSellers, query.limit).await
}

async fn ranked(
    state: &AppState,
    ranking: ProductRanking,
    limit: Option<i64>,
) -> Result<ApiData<Vec<Product>>> {
    let limit = catalog::clamp_limit(limit, catalog::DEFAULT_PANEL_LIMIT);
    let rows = catalog::ranked(state.store(), ranking, limit, catalog::RANKED_ON_ERROR).await?;
    Ok(ApiData::new(rows))
}
