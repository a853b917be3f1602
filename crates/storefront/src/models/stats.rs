//! Admin dashboard aggregate.

use rust_decimal::Decimal;
use serde::Serialize;

/// Headline numbers for the admin dashboard.
///
/// Every metric defaults to zero when its query fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_products: i64,
    pub total_users: i64,
    pub total_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales_volume: Decimal,
}
