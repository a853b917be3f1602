//! Session middleware configuration.
//!
//! The layer is generic over the session store: `PostgresStore` backs the
//! postgres deployment, `tower_sessions::MemoryStore` the memory backend.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::FitovaConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fitova_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
///
/// Cookies are marked `Secure` when the configured base URL is https.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &FitovaConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
