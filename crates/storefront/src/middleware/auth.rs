//! Authentication extractors.
//!
//! The session holds only the signed-in [`Identity`]. These extractors read it
//! once per request and hand it to handlers explicitly; nothing downstream
//! touches the session to find out who is acting.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{Identity, session_keys};

/// Extractor that requires a signed-in identity.
///
/// Rejects with `401 {"success": false, "error": "Unauthorized"}` when the
/// session has no identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(RequireIdentity(identity): RequireIdentity) -> impl IntoResponse {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
pub struct RequireIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeIdentity(identity) = MaybeIdentity::from_request_parts(parts, state)
            .await
            .unwrap_or(MaybeIdentity(None));

        identity
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
    }
}

/// Extractor that optionally gets the signed-in identity.
///
/// Unlike `RequireIdentity`, this never rejects; admin routes use it so the
/// guard decides between 401 and 403.
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<Identity>(session_keys::IDENTITY)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(identity))
    }
}

/// Store the signed-in identity in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_identity(
    session: &Session,
    identity: &Identity,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::IDENTITY, identity).await
}

/// Drop the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot delete the record.
pub async fn clear_identity(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
