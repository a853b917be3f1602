//! Outbound affiliate redirect.

use axum::{extract::State, response::Redirect};
use tracing::instrument;

use fitova_core::ProductId;

use super::ApiPath;
use crate::error::{Result, add_breadcrumb};
use crate::services::catalog;
use crate::state::AppState;

/// Count the click and send the visitor to the partner shop.
///
/// GET /go/{product_id}
///
/// Answers `303 See Other`; unknown or inactive products are a 404.
#[instrument(skip(state))]
pub async fn follow(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Redirect> {
    let url = catalog::follow_affiliate_link(state.store(), product_id).await?;

    add_breadcrumb(
        "affiliate",
        "Outbound click",
        Some(&[("product_id", &product_id.to_string())]),
    );

    Ok(Redirect::to(&url))
}
