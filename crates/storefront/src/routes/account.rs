//! Signed-in account handlers: own profile and addresses.
//!
//! Every handler takes the identity from [`RequireIdentity`] and passes it
//! down; the helpers scope all reads and writes to that owner.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use fitova_core::AddressId;

use super::{ApiData, ApiJson, ApiPath};
use crate::error::Result;
use crate::middleware::RequireIdentity;
use crate::models::{Address, Profile};
use crate::services::forms::{AddressPayload, Form, ProfilePayload};
use crate::services::{addresses, profiles};
use crate::state::AppState;

/// Own profile.
///
/// GET /api/me
#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn me(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<ApiData<Profile>> {
    let profile = profiles::current(state.store(), &identity).await?;
    Ok(ApiData::new(profile))
}

/// Update own profile.
///
/// PATCH /api/me
#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiJson(payload): ApiJson<ProfilePayload>,
) -> Result<ApiData<Profile>> {
    let changes = payload.check()?;
    let profile = profiles::update(state.store(), &identity, &changes).await?;
    Ok(ApiData::new(profile))
}

/// Own addresses, default first.
///
/// GET /api/addresses
#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<ApiData<Vec<Address>>> {
    let rows = addresses::list(state.store(), &identity, addresses::ON_ERROR).await?;
    Ok(ApiData::new(rows))
}

/// Add an address.
///
/// POST /api/addresses
#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiJson(payload): ApiJson<AddressPayload>,
) -> Result<(StatusCode, ApiData<Address>)> {
    let address = payload.check()?;
    let row = addresses::add(state.store(), &identity, &address).await?;
    Ok((StatusCode::CREATED, ApiData::new(row)))
}

/// Replace an address.
///
/// PUT /api/addresses/{id}
#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiPath(id): ApiPath<AddressId>,
    ApiJson(payload): ApiJson<AddressPayload>,
) -> Result<ApiData<Address>> {
    let address = payload.check()?;
    let row = addresses::update(state.store(), &identity, id, &address).await?;
    Ok(ApiData::new(row))
}

/// Delete an address.
///
/// DELETE /api/addresses/{id}
#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiPath(id): ApiPath<AddressId>,
) -> Result<ApiData<()>> {
    addresses::remove(state.store(), &identity, id).await?;
    Ok(ApiData::new(()))
}

/// Make an address the only default.
///
/// POST /api/addresses/{id}/default
#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn set_default_address(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiPath(id): ApiPath<AddressId>,
) -> Result<ApiData<()>> {
    addresses::make_default(state.store(), &identity, id).await?;
    Ok(ApiData::new(()))
}
