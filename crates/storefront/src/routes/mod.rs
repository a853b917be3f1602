//! HTTP route handlers for the storefront.
//!
//! Every API response uses the envelope `{"success": true, "data": ...}` or
//! `{"success": false, "error": "..."}`.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness
//! GET    /health/ready                    - Store health check
//!
//! # Auth
//! POST   /auth/register                   - Create account and sign in
//! POST   /auth/login                      - Sign in
//! POST   /auth/logout                     - Sign out
//!
//! # Catalog
//! GET    /api/categories                  - Active categories
//! GET    /api/offers                      - Redeemable offers
//! GET    /api/testimonials?limit          - Visible testimonials
//! GET    /api/homepage-slides             - Active homepage slides
//! GET    /api/products?category&featured&limit
//! GET    /api/products/trending?limit     - Most clicked
//! GET    /api/products/best-sellers?limit - Most sold
//! GET    /api/products/{slug}             - Product detail
//! GET    /go/{product_id}                 - Affiliate redirect (303)
//!
//! # Contact
//! POST   /api/contact                     - Contact form
//!
//! # Account (requires sign-in)
//! GET    /api/me                          - Own profile
//! PATCH  /api/me                          - Update own profile
//! GET    /api/addresses                   - Own addresses
//! POST   /api/addresses                   - Add address
//! PUT    /api/addresses/{id}              - Replace address
//! DELETE /api/addresses/{id}              - Delete address
//! POST   /api/addresses/{id}/default      - Make default
//!
//! # Admin (requires admin profile)
//! GET    /api/admin/homepage-slides       - All slides
//! POST   /api/admin/homepage-slides       - Create slide
//! GET    /api/admin/stats                 - Dashboard figures
//! GET    /api/admin/products/recent       - Newest products
//! GET    /api/admin/products/top          - Most clicked products
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod contact;
pub mod go;
pub mod health;

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::{auth_rate_limiter, contact_rate_limiter};
use crate::state::AppState;

// =============================================================================
// Envelope and Extractors
// =============================================================================

/// Successful response body: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiData<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiData<T> {
    /// Wrap `data` in the success envelope.
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiData<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// JSON body extractor that rejects with the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that rejects with the error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor that rejects with the error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `?limit=` on listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the public catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::categories))
        .route("/offers", get(catalog::offers))
        .route("/testimonials", get(catalog::testimonials))
        .route("/homepage-slides", get(catalog::homepage_slides))
        .route("/products", get(catalog::products))
        .route("/products/trending", get(catalog::trending))
        .route("/products/best-sellers", get(catalog::best_sellers))
        .route("/products/{slug}", get(catalog::product))
}

/// Create the contact form router.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(contact::submit))
        .layer(contact_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(account::me).patch(account::update_me))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            axum::routing::put(account::update_address).delete(account::delete_address),
        )
        .route("/addresses/{id}/default", post(account::set_default_address))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/homepage-slides",
            get(admin::list_slides).post(admin::create_slide),
        )
        .route("/stats", get(admin::stats))
        .route("/products/recent", get(admin::recent_products))
        .route("/products/top", get(admin::top_products))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest(
            "/api",
            catalog_routes()
                .merge(contact_routes())
                .merge(account_routes())
                .nest("/admin", admin_routes()),
        )
        .route("/go/{product_id}", get(go::follow))
}
