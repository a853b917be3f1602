//! Domain models for the storefront.
//!
//! Row types returned by the store and payload types accepted by it. The
//! structs that map one-to-one onto a table derive `sqlx::FromRow` directly;
//! the rest are assembled in `db`.

pub mod address;
pub mod catalog;
pub mod content;
pub mod offer;
pub mod profile;
pub mod session;
pub mod stats;

pub use address::{Address, NewAddress};
pub use catalog::{Category, Product, ProductQuery, ProductRanking};
pub use content::{
    ContactMessage, HomepageSlide, NewContactMessage, NewHomepageSlide, Testimonial,
};
pub use offer::Offer;
pub use profile::{Profile, ProfileChanges};
pub use session::{Identity, keys as session_keys};
pub use stats::AdminStats;
