//! Query helpers and business logic.
//!
//! Every helper takes the store and, where ownership matters, the caller's
//! [`Identity`](crate::models::Identity) explicitly. Nothing here reads
//! request state.
//!
//! # Services
//!
//! - `auth` - password sign-up/sign-in and the admin guard
//! - `addresses`, `profiles` - owner-scoped account data
//! - `catalog` - categories, products and ranked listings
//! - `offers` - currently redeemable offers
//! - `content` - testimonials and homepage slides
//! - `contact` - contact form submissions
//! - `stats` - admin dashboard figures
//! - `forms` - request payload schemas

pub mod addresses;
pub mod auth;
pub mod catalog;
pub mod contact;
pub mod content;
pub mod forms;
pub mod listing;
pub mod offers;
pub mod profiles;
pub mod stats;

pub use listing::OnError;
