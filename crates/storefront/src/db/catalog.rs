//! Catalog repository: categories, products and product rankings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use fitova_core::{CategoryId, CurrencyCode, Price, ProductId};

use super::{PgStore, RepositoryError};
use crate::models::{Category, Product, ProductQuery, ProductRanking};

/// Read access to the catalog plus click tracking.
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// Categories ordered by `sort_order`, then `name` ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn categories(&self, active_only: bool) -> Result<Vec<Category>, RepositoryError>;

    /// Active products matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError>;

    /// A single active product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError>;

    /// Active products whose id is in `ids`. Row order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Run a ranking procedure and return product ids, best first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the procedure fails.
    async fn rank_products(
        &self,
        ranking: ProductRanking,
        limit: i64,
    ) -> Result<Vec<ProductId>, RepositoryError>;

    /// Most recently added products, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn recent_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError>;

    /// Products with the most outbound clicks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn top_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError>;

    /// Count an outbound click and return the affiliate URL to send the
    /// shopper to. `None` when the product is unknown or inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the procedure fails.
    async fn record_click(&self, id: ProductId) -> Result<Option<String>, RepositoryError>;

    /// Total number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the count fails.
    async fn count_products(&self) -> Result<i64, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    category_id: Option<CategoryId>,
    name: String,
    slug: String,
    brand: Option<String>,
    description: Option<String>,
    price: Decimal,
    original_price: Option<Decimal>,
    currency: String,
    image_url: Option<String>,
    affiliate_url: String,
    is_active: bool,
    is_featured: bool,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency: CurrencyCode = row.currency.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            slug: row.slug,
            brand: row.brand,
            description: row.description,
            price: Price::new(row.price, currency),
            original_price: row.original_price.map(|amount| Price::new(amount, currency)),
            image_url: row.image_url,
            affiliate_url: row.affiliate_url,
            is_active: row.is_active,
            is_featured: row.is_featured,
            click_count: row.click_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

const PRODUCT_COLUMNS: &str = "id, category_id, name, slug, brand, description, price, \
     original_price, currency, image_url, affiliate_url, is_active, is_featured, click_count, \
     created_at, updated_at";

#[async_trait]
impl CatalogRepo for PgStore {
    async fn categories(&self, active_only: bool) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, description, image_url, sort_order, is_active, created_at
            FROM categories
            WHERE is_active OR NOT $1
            ORDER BY sort_order ASC, name ASC
            ",
        )
        .bind(active_only)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active
              AND ($1::uuid IS NULL OR category_id = $1)
              AND (is_featured OR NOT $2)
            ORDER BY created_at DESC
            LIMIT $3
            "
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(query.category_id)
            .bind(query.featured_only)
            .bind(query.limit)
            .fetch_all(self.pool())
            .await?;
        into_products(rows)
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1 AND is_active");
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await?
            .map(Product::try_from)
            .transpose()
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1) AND is_active");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(ids)
            .fetch_all(self.pool())
            .await?;
        into_products(rows)
    }

    async fn rank_products(
        &self,
        ranking: ProductRanking,
        limit: i64,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        // Procedure names come from a closed enum, never from input.
        let sql = format!("SELECT product_id FROM {}($1)", ranking.procedure());
        let ids = sqlx::query_scalar::<_, ProductId>(&sql)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;
        Ok(ids)
    }

    async fn recent_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC LIMIT $1");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;
        into_products(rows)
    }

    async fn top_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             ORDER BY click_count DESC, created_at DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;
        into_products(rows)
    }

    async fn record_click(&self, id: ProductId) -> Result<Option<String>, RepositoryError> {
        let url = sqlx::query_scalar::<_, Option<String>>("SELECT record_product_click($1)")
            .bind(id)
            .fetch_one(self.pool())
            .await?;
        Ok(url)
    }

    async fn count_products(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
