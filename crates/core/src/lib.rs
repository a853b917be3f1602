//! Fitova Core - Shared domain types.
//!
//! This crate provides the types shared by every Fitova component:
//! - `storefront` - Storefront and admin JSON API
//! - `cli` - Migrations and operator tooling
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. The optional `postgres` feature adds sqlx
//! encode/decode support so the types can be bound directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, emails, prices and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
