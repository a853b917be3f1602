//! Store capability: the repository traits every query helper talks to.
//!
//! The storefront never reaches into a database directly. Each concern is a
//! small `async_trait` repository, and [`Store`] bundles them into the one
//! capability handed around in application state:
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx (production)
//! - [`MemoryStore`] - in-process maps (local development and tests)
//!
//! # Tables
//!
//! - `users` / `profiles` - identities and their profile (admin flag)
//! - `addresses` - shipping addresses, one default per owner
//! - `categories`, `products`, `product_clicks` - affiliate catalog
//! - `offers` - promotions
//! - `testimonials`, `homepage_slides` - marketing content
//! - `contact_messages` - contact form submissions
//! - `orders`, `order_items` - sales used for admin figures and rankings
//! - `tower_sessions.session` - session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p fitova-cli -- migrate
//! ```

pub mod addresses;
pub mod catalog;
pub mod contact;
pub mod content;
pub mod identity;
pub mod memory;
pub mod offers;
pub mod orders;
pub mod profiles;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepo;
pub use catalog::CatalogRepo;
pub use contact::ContactRepo;
pub use content::ContentRepo;
pub use identity::IdentityRepo;
pub use memory::MemoryStore;
pub use offers::OfferRepo;
pub use orders::OrderRepo;
pub use profiles::ProfileRepo;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The full store capability used by the application.
///
/// Anything implementing every repository trait can back the storefront.
#[async_trait]
pub trait Store:
    IdentityRepo
    + ProfileRepo
    + AddressRepo
    + CatalogRepo
    + OfferRepo
    + ContentRepo
    + ContactRepo
    + OrderRepo
    + Send
    + Sync
{
    /// Check that the store can serve requests.
    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
fn conflict_or_database(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
