//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use fitova_core::{Email, UserId};

/// The signed-in identity.
///
/// Minimal data stored in the session at sign-in. Everything else about the
/// user (including the admin flag) is looked up from the store per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User's id, shared with their profile row.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the signed-in identity.
    pub const IDENTITY: &str = "identity";
}
