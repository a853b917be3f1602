//! Sign-in handlers.
//!
//! The session stores only the [`Identity`]; the admin flag and the rest of
//! the profile are read from the store on each request that needs them.

use axum::{extract::State, http::StatusCode};
use tower_sessions::Session;
use tracing::{info, instrument};

use super::{ApiData, ApiJson};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_identity, set_identity};
use crate::models::Identity;
use crate::services::auth::AuthService;
use crate::services::forms::{Form, LoginPayload, RegisterPayload};
use crate::state::AppState;

/// Create an account and sign in.
///
/// POST /auth/register
#[instrument(skip(state, session, payload))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> Result<(StatusCode, ApiData<Identity>)> {
    let registration = payload.check()?;

    let identity = AuthService::new(state.store())
        .register(
            &registration.email,
            &registration.password,
            registration.full_name.as_deref(),
        )
        .await?;

    set_identity(&session, &identity).await?;
    set_sentry_user(&identity.id, Some(identity.email.as_str()));
    info!(user_id = %identity.id, "Account registered");

    Ok((StatusCode::CREATED, ApiData::new(identity)))
}

/// Sign in with email and password.
///
/// POST /auth/login
#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<ApiData<Identity>> {
    let credentials = payload.check()?;

    let identity = AuthService::new(state.store())
        .login(&credentials.email, &credentials.password)
        .await?;

    set_identity(&session, &identity).await?;
    set_sentry_user(&identity.id, Some(identity.email.as_str()));

    Ok(ApiData::new(identity))
}

/// Sign out.
///
/// POST /auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<ApiData<()>> {
    clear_identity(&session).await?;
    clear_sentry_user();
    Ok(ApiData::new(()))
}
