//! Contact form handler.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use super::{ApiData, ApiJson};
use crate::error::Result;
use crate::models::ContactMessage;
use crate::services::{
    contact,
    forms::{ContactPayload, Form},
};
use crate::state::AppState;

/// Store a contact message.
///
/// POST /api/contact
#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ContactPayload>,
) -> Result<(StatusCode, ApiData<ContactMessage>)> {
    let message = payload.check()?;
    let row = contact::submit(state.store(), &message).await?;
    Ok((StatusCode::CREATED, ApiData::new(row)))
}
