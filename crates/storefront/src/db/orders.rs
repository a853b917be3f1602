//! Order repository (read-only figures for the admin dashboard).

use async_trait::async_trait;
use rust_decimal::Decimal;

use fitova_core::OrderStatus;

use super::{PgStore, RepositoryError};

/// Order counts and totals.
#[async_trait]
pub trait OrderRepo: Send + Sync {
    /// Total number of orders in any status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the count fails.
    async fn count_orders(&self) -> Result<i64, RepositoryError>;

    /// `total_amount` of every completed order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn completed_order_totals(&self) -> Result<Vec<Decimal>, RepositoryError>;
}

#[async_trait]
impl OrderRepo for PgStore {
    async fn count_orders(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn completed_order_totals(&self) -> Result<Vec<Decimal>, RepositoryError> {
        let totals = sqlx::query_scalar("SELECT total_amount FROM orders WHERE status = $1")
            .bind(OrderStatus::Completed)
            .fetch_all(self.pool())
            .await?;
        Ok(totals)
    }
}
