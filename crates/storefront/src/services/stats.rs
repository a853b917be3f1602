//! Admin dashboard figures.

use tracing::{error, instrument};

use crate::db::{CatalogRepo, OrderRepo, ProfileRepo, RepositoryError};
use crate::models::AdminStats;

/// Collect the dashboard figures.
///
/// The four queries run concurrently. A failed query is logged and its
/// metric reported as zero; the others are unaffected.
#[instrument(skip(store))]
pub async fn admin_stats<S>(store: &S) -> AdminStats
where
    S: CatalogRepo + ProfileRepo + OrderRepo + ?Sized,
{
    let (products, users, orders, totals) = tokio::join!(
        store.count_products(),
        store.count_profiles(),
        store.count_orders(),
        store.completed_order_totals(),
    );

    AdminStats {
        total_products: or_zero("products", products),
        total_users: or_zero("users", users),
        total_orders: or_zero("orders", orders),
        total_sales_volume: or_zero("sales volume", totals.map(|t| t.into_iter().sum())),
    }
}

fn or_zero<T: Default>(metric: &'static str, result: Result<T, RepositoryError>) -> T {
    result.unwrap_or_else(|e| {
        error!(metric, error = %e, "Failed to load admin metric");
        T::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use fitova_core::{CurrencyCode, Email, OrderStatus, Price, ProductId};

    use super::*;
    use crate::db::{IdentityRepo, MemoryStore, memory::Operation};
    use crate::models::Product;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for i in 0..3 {
            let now = Utc::now();
            store
                .seed_product(Product {
                    id: ProductId::generate(),
                    category_id: None,
                    name: format!("Product {i}"),
                    slug: format!("product-{i}"),
                    brand: None,
                    description: None,
                    price: Price::new(Decimal::TEN, CurrencyCode::USD),
                    original_price: None,
                    image_url: None,
                    affiliate_url: "https://partner.example".to_owned(),
                    is_active: true,
                    is_featured: false,
                    click_count: 0,
                    created_at: now,
                    updated_at: now,
                })
                .await;
        }
        for i in 0..5 {
            let email = Email::parse(&format!("user{i}@fitova.shop")).unwrap();
            store.create_identity(&email, "hash", None).await.unwrap();
        }
        store
            .seed_order(OrderStatus::Completed, Decimal::from(10))
            .await;
        store
            .seed_order(OrderStatus::Completed, Decimal::from(25))
            .await;
        store
    }

    #[tokio::test]
    async fn test_admin_stats_aggregates() {
        let store = seeded().await;

        let stats = admin_stats(&store).await;

        assert_eq!(
            stats,
            AdminStats {
                total_products: 3,
                total_users: 5,
                total_orders: 2,
                total_sales_volume: Decimal::from(35),
            }
        );
    }

    #[tokio::test]
    async fn test_failed_metric_defaults_to_zero_alone() {
        let store = seeded().await;
        store.fail(Operation::CountProfiles);

        let stats = admin_stats(&store).await;

        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_sales_volume, Decimal::from(35));
    }

    #[tokio::test]
    async fn test_failed_totals_default_to_zero() {
        let store = seeded().await;
        store.fail(Operation::CompletedOrderTotals);

        let stats = admin_stats(&store).await;

        assert_eq!(stats.total_sales_volume, Decimal::ZERO);
        assert_eq!(stats.total_orders, 2);
    }

    #[tokio::test]
    async fn test_all_four_queries_issued() {
        let store = MemoryStore::new();

        let stats = admin_stats(&store).await;

        assert_eq!(stats, AdminStats::default());
        for op in [
            Operation::CountProducts,
            Operation::CountProfiles,
            Operation::CountOrders,
            Operation::CompletedOrderTotals,
        ] {
            assert_eq!(store.calls(op), 1);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let stats = AdminStats {
            total_products: 3,
            total_users: 5,
            total_orders: 2,
            total_sales_volume: Decimal::from(35),
        };

        let json = serde_json::to_value(stats).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "totalProducts": 3,
                "totalUsers": 5,
                "totalOrders": 2,
                "totalSalesVolume": 35.0
            })
        );
    }
}
