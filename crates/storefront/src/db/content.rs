//! Marketing content repository: testimonials and homepage slides.

use async_trait::async_trait;

use super::{PgStore, RepositoryError};
use crate::models::{HomepageSlide, NewHomepageSlide, Testimonial};

/// Testimonials and homepage carousel content.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Visible testimonials ordered by `sort_order` ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn testimonials(&self, limit: Option<i64>) -> Result<Vec<Testimonial>, RepositoryError>;

    /// Homepage slides ordered by `sort_order` ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn homepage_slides(
        &self,
        active_only: bool,
    ) -> Result<Vec<HomepageSlide>, RepositoryError>;

    /// Insert a slide and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    async fn insert_homepage_slide(
        &self,
        slide: &NewHomepageSlide,
    ) -> Result<HomepageSlide, RepositoryError>;
}

const SLIDE_COLUMNS: &str = "id, title, subtitle, description, button_text, button_link, \
     image_url, sort_order, is_active, created_at, updated_at";

#[async_trait]
impl ContentRepo for PgStore {
    async fn testimonials(&self, limit: Option<i64>) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, Testimonial>(
            r"
            SELECT id, name, role, quote, rating, avatar_url, is_visible, sort_order, created_at
            FROM testimonials
            WHERE is_visible
            ORDER BY sort_order ASC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn homepage_slides(
        &self,
        active_only: bool,
    ) -> Result<Vec<HomepageSlide>, RepositoryError> {
        let sql = format!(
            "SELECT {SLIDE_COLUMNS} FROM homepage_slides \
             WHERE is_active OR NOT $1 ORDER BY sort_order ASC"
        );
        let rows = sqlx::query_as::<_, HomepageSlide>(&sql)
            .bind(active_only)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    async fn insert_homepage_slide(
        &self,
        slide: &NewHomepageSlide,
    ) -> Result<HomepageSlide, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO homepage_slides
                (title, subtitle, description, button_text, button_link, image_url,
                 sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SLIDE_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, HomepageSlide>(&sql)
            .bind(&slide.title)
            .bind(&slide.subtitle)
            .bind(&slide.description)
            .bind(&slide.button_text)
            .bind(&slide.button_link)
            .bind(&slide.image_url)
            .bind(slide.sort_order)
            .bind(slide.is_active)
            .fetch_one(self.pool())
            .await?;
        Ok(row)
    }
}
