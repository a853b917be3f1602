//! Admin API handlers.
//!
//! Each handler takes the optional identity and runs the admin guard itself,
//! so a missing sign-in answers 401 and a non-admin 403.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use super::{ApiData, ApiJson, ApiQuery, LimitQuery};
use crate::error::{AppError, Result};
use crate::middleware::MaybeIdentity;
use crate::models::{AdminStats, HomepageSlide, Product};
use crate::services::forms::{Form, SlidePayload};
use crate::services::{OnError, auth::require_admin, catalog, content, stats};
use crate::state::AppState;

const LIST_SLIDES_ROUTE: &str = "GET /api/admin/homepage-slides";
const CREATE_SLIDE_ROUTE: &str = "POST /api/admin/homepage-slides";

/// All homepage slides, inactive included.
///
/// GET /api/admin/homepage-slides
#[instrument(skip(state, identity))]
pub async fn list_slides(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<ApiData<Vec<HomepageSlide>>> {
    require_admin(state.store(), identity.as_ref()).await?;

    let rows = content::slides(state.store(), false, OnError::Fail)
        .await
        .map_err(|e| AppError::unhandled(LIST_SLIDES_ROUTE, e))?;
    Ok(ApiData::new(rows))
}

/// Create a homepage slide.
///
/// POST /api/admin/homepage-slides
///
/// The body is validated before the guard runs: an invalid payload is a 400
/// whoever sends it.
#[instrument(skip(state, identity, payload))]
pub async fn create_slide(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    ApiJson(payload): ApiJson<SlidePayload>,
) -> Result<(StatusCode, ApiData<HomepageSlide>)> {
    let slide = payload.check()?;

    require_admin(state.store(), identity.as_ref()).await?;

    let row = content::create_slide(state.store(), &slide)
        .await
        .map_err(|e| AppError::unhandled(CREATE_SLIDE_ROUTE, e))?;
    Ok((StatusCode::CREATED, ApiData::new(row)))
}

/// Dashboard figures.
///
/// GET /api/admin/stats
#[instrument(skip(state, identity))]
pub async fn stats(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<ApiData<AdminStats>> {
    require_admin(state.store(), identity.as_ref()).await?;
    Ok(ApiData::new(stats::admin_stats(state.store()).await))
}

/// Newest products.
///
/// GET /api/admin/products/recent?limit=
#[instrument(skip(state, identity))]
pub async fn recent_products(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<ApiData<Vec<Product>>> {
    require_admin(state.store(), identity.as_ref()).await?;

    let limit = catalog::clamp_limit(query.limit, catalog::DEFAULT_PANEL_LIMIT);
    let rows = catalog::recent(state.store(), limit, catalog::RANKED_ON_ERROR).await?;
    Ok(ApiData::new(rows))
}

/// Most clicked products.
///
/// GET /api/admin/products/top?limit=
#[instrument(skip(state, identity))]
pub async fn top_products(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<ApiData<Vec<Product>>> {
    require_admin(state.store(), identity.as_ref()).await?;

    let limit = catalog::clamp_limit(query.limit, catalog::DEFAULT_PANEL_LIMIT);
    let rows = catalog::top(state.store(), limit, catalog::RANKED_ON_ERROR).await?;
    Ok(ApiData::new(rows))
}
