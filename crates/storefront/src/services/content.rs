//! Testimonials and homepage slides.

use tracing::{info, instrument};

use super::OnError;
use crate::db::{ContentRepo, RepositoryError};
use crate::models::{HomepageSlide, NewHomepageSlide, Testimonial};

/// Marketing sections never block a page.
pub const ON_ERROR: OnError = OnError::Degrade;

/// Visible testimonials by `sort_order`.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store))]
pub async fn testimonials<S>(
    store: &S,
    limit: Option<i64>,
    on_error: OnError,
) -> Result<Vec<Testimonial>, RepositoryError>
where
    S: ContentRepo + ?Sized,
{
    on_error.apply("testimonials", store.testimonials(limit).await)
}

/// Homepage slides by `sort_order`. The storefront shows active slides only;
/// the admin sees all of them.
///
/// # Errors
///
/// Returns `RepositoryError` under [`OnError::Fail`].
#[instrument(skip(store))]
pub async fn slides<S>(
    store: &S,
    active_only: bool,
    on_error: OnError,
) -> Result<Vec<HomepageSlide>, RepositoryError>
where
    S: ContentRepo + ?Sized,
{
    on_error.apply("homepage slides", store.homepage_slides(active_only).await)
}

/// Persist a validated slide.
///
/// # Errors
///
/// Returns `RepositoryError` if the insert fails.
#[instrument(skip(store, slide), fields(title = %slide.title))]
pub async fn create_slide<S>(
    store: &S,
    slide: &NewHomepageSlide,
) -> Result<HomepageSlide, RepositoryError>
where
    S: ContentRepo + ?Sized,
{
    let row = store.insert_homepage_slide(slide).await?;
    info!(slide_id = %row.id, "Homepage slide created");
    Ok(row)
}
