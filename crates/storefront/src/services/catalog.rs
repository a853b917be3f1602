//! Catalog helpers: categories, product listings and ranked products.

use std::collections::HashMap;

use tracing::{debug, instrument};

use fitova_core::ProductId;

use super::OnError;
use crate::db::{CatalogRepo, RepositoryError};
use crate::models::{Category, Product, ProductQuery, ProductRanking};

/// Categories drive navigation: store errors propagate.
pub const CATEGORIES_ON_ERROR: OnError = OnError::Fail;

/// Trending, best-seller and admin product panels never block a page.
pub const RANKED_ON_ERROR: OnError = OnError::Degrade;

/// Default number of products in a ranked or admin panel.
pub const DEFAULT_PANEL_LIMIT: i64 = 8;

/// Upper bound on any caller-supplied limit.
pub const MAX_LIMIT: i64 = 100;

/// Clamp a caller-supplied limit into `1..=MAX_LIMIT`.
#[must_use]
pub fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

/// Active categories ordered by `sort_order`, then `name`.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store))]
pub async fn categories<S>(store: &S, on_error: OnError) -> Result<Vec<Category>, RepositoryError>
where
    S: CatalogRepo + ?Sized,
{
    on_error.apply("categories", store.categories(true).await)
}

/// Active products matching `query`, newest first.
///
/// # Errors
///
/// Returns `RepositoryError` if the query fails.
#[instrument(skip(store))]
pub async fn products<S>(store: &S, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError>
where
    S: CatalogRepo + ?Sized,
{
    store.products(query).await
}

/// A single active product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no active product has this slug.
#[instrument(skip(store))]
pub async fn product<S>(store: &S, slug: &str) -> Result<Product, RepositoryError>
where
    S: CatalogRepo + ?Sized,
{
    store
        .product_by_slug(slug)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Products in ranked order.
///
/// Runs the ranking procedure, fetches the rows for the returned ids in one
/// batch, then restores the ranking order. When the ranking fails or comes
/// back empty the batch fetch is skipped.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store))]
pub async fn ranked<S>(
    store: &S,
    ranking: ProductRanking,
    limit: i64,
    on_error: OnError,
) -> Result<Vec<Product>, RepositoryError>
where
    S: CatalogRepo + ?Sized,
{
    let resource = ranking.procedure();
    let ids = on_error.apply(resource, store.rank_products(ranking, limit).await)?;
    if ids.is_empty() {
        debug!(resource, "Ranking returned no products");
        return Ok(Vec::new());
    }

    let rows = on_error.apply(resource, store.products_by_ids(&ids).await)?;
    Ok(in_ranked_order(&ids, rows))
}

/// Reorder `rows` to follow `ids`. Rows whose id is not ranked go last.
fn in_ranked_order(ids: &[ProductId], mut rows: Vec<Product>) -> Vec<Product> {
    let mut position = HashMap::with_capacity(ids.len());
    for (index, id) in ids.iter().enumerate() {
        position.entry(*id).or_insert(index);
    }
    rows.sort_by_key(|p| position.get(&p.id).copied().unwrap_or(usize::MAX));
    rows
}

/// Most recently added products, for the admin dashboard.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store))]
pub async fn recent<S>(
    store: &S,
    limit: i64,
    on_error: OnError,
) -> Result<Vec<Product>, RepositoryError>
where
    S: CatalogRepo + ?Sized,
{
    on_error.apply("recent products", store.recent_products(limit).await)
}

/// Most clicked products, for the admin dashboard.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store))]
pub async fn top<S>(store: &S, limit: i64, on_error: OnError) -> Result<Vec<Product>, RepositoryError>
where
    S: CatalogRepo + ?Sized,
{
    on_error.apply("top products", store.top_products(limit).await)
}

/// Count an outbound click and return where to send the shopper.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product is unknown or inactive.
#[instrument(skip(store))]
pub async fn follow_affiliate_link<S>(store: &S, id: ProductId) -> Result<String, RepositoryError>
where
    S: CatalogRepo + ?Sized,
{
    store
        .record_click(id)
        .await?
        .ok_or(RepositoryError::NotFound)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use fitova_core::{CategoryId, CurrencyCode, Price};

    use super::*;
    use crate::db::{MemoryStore, memory::Operation};

    fn product(slug: &str, age_days: i64) -> Product {
        let created = Utc::now() - Duration::days(age_days);
        Product {
            id: ProductId::generate(),
            category_id: None,
            name: slug.replace('-', " "),
            slug: slug.to_owned(),
            brand: Some("Fitova".to_owned()),
            description: None,
            price: Price::new(Decimal::new(4999, 2), CurrencyCode::USD),
            original_price: None,
            image_url: None,
            affiliate_url: format!("https://partner.example/{slug}"),
            is_active: true,
            is_featured: false,
            click_count: 0,
            created_at: created,
            updated_at: created,
        }
    }

    fn category(name: &str, sort_order: i32, is_active: bool) -> Category {
        Category {
            id: CategoryId::generate(),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            description: None,
            image_url: None,
            sort_order,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_in_ranked_order_restores_ranking() {
        let a = product("a", 1);
        let b = product("b", 2);
        let c = product("c", 3);
        let ids = [c.id, a.id, b.id];

        let sorted = in_ranked_order(&ids, vec![a.clone(), b.clone(), c.clone()]);

        let slugs: Vec<_> = sorted.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_ranked_follows_procedure_order() {
        let store = MemoryStore::new();
        let (a, b, c) = (product("a", 1), product("b", 2), product("c", 3));
        for p in [&a, &b, &c] {
            store.seed_product(p.clone()).await;
        }
        store
            .set_ranking(ProductRanking::BestSellers, vec![c.id, a.id, b.id])
            .await;

        let rows = ranked(&store, ProductRanking::BestSellers, 10, RANKED_ON_ERROR)
            .await
            .unwrap();

        let ids: Vec<_> = rows.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![c.id, a.id, b.id]);
    }

    #[tokio::test]
    async fn test_ranked_is_idempotent() {
        let store = MemoryStore::new();
        let (a, b) = (product("a", 1), product("b", 2));
        store.seed_product(a.clone()).await;
        store.seed_product(b.clone()).await;
        store
            .set_ranking(ProductRanking::Trending, vec![b.id, a.id])
            .await;

        let first = ranked(&store, ProductRanking::Trending, 10, RANKED_ON_ERROR)
            .await
            .unwrap();
        let second = ranked(&store, ProductRanking::Trending, 10, RANKED_ON_ERROR)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_ranking_skips_batch_fetch() {
        let store = MemoryStore::new();
        store.seed_product(product("a", 1)).await;

        let rows = ranked(&store, ProductRanking::BestSellers, 10, RANKED_ON_ERROR)
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(store.calls(Operation::ProductsByIds), 0);
    }

    #[tokio::test]
    async fn test_failed_ranking_degrades_without_batch_fetch() {
        let store = MemoryStore::new();
        store.fail(Operation::RankProducts);

        let rows = ranked(&store, ProductRanking::Trending, 10, RANKED_ON_ERROR)
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(store.calls(Operation::ProductsByIds), 0);
    }

    #[tokio::test]
    async fn test_failed_ranking_with_fail_policy_errors() {
        let store = MemoryStore::new();
        store.fail(Operation::RankProducts);

        let result = ranked(&store, ProductRanking::Trending, 10, OnError::Fail).await;

        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_categories_sorted_and_active_only() {
        let store = MemoryStore::new();
        store.seed_category(category("Shoes", 2, true)).await;
        store.seed_category(category("Dresses", 1, true)).await;
        store.seed_category(category("Bags", 2, true)).await;
        store.seed_category(category("Archive", 0, false)).await;

        let rows = categories(&store, CATEGORIES_ON_ERROR).await.unwrap();

        let names: Vec<_> = rows.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Dresses", "Bags", "Shoes"]);
    }

    #[tokio::test]
    async fn test_categories_failure_propagates() {
        let store = MemoryStore::new();
        store.fail(Operation::Categories);

        assert!(categories(&store, CATEGORIES_ON_ERROR).await.is_err());
    }

    #[tokio::test]
    async fn test_admin_panels_degrade() {
        let store = MemoryStore::new();
        store.fail(Operation::RecentProducts);
        store.fail(Operation::TopProducts);

        assert!(recent(&store, 5, RANKED_ON_ERROR).await.unwrap().is_empty());
        assert!(top(&store, 5, RANKED_ON_ERROR).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_follow_affiliate_link_counts_click() {
        let store = MemoryStore::new();
        let p = product("linen-shirt", 1);
        store.seed_product(p.clone()).await;

        let url = follow_affiliate_link(&store, p.id).await.unwrap();

        assert_eq!(url, "https://partner.example/linen-shirt");
        let most_clicked = top(&store, 1, OnError::Fail).await.unwrap();
        assert_eq!(most_clicked[0].click_count, 1);
        assert!(matches!(
            follow_affiliate_link(&store, ProductId::generate()).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 8), 8);
        assert_eq!(clamp_limit(Some(0), 8), 1);
        assert_eq!(clamp_limit(Some(1000), 8), MAX_LIMIT);
    }
}
