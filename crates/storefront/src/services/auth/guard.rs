//! Admin authorization guard.

use tracing::{instrument, warn};

use crate::db::ProfileRepo;
use crate::models::{Identity, Profile};

use super::GuardError;

/// Check that the caller is a signed-in administrator.
///
/// The profile is looked up on every call; nothing is cached between
/// requests. Without an identity the lookup is skipped entirely.
///
/// # Errors
///
/// Returns `GuardError::Unauthenticated` when `identity` is `None`, and
/// `GuardError::Forbidden` when the profile is missing, cannot be read, or
/// is not flagged as admin.
#[instrument(skip_all, fields(user_id = ?identity.map(|i| i.id)))]
pub async fn require_admin<S>(store: &S, identity: Option<&Identity>) -> Result<Profile, GuardError>
where
    S: ProfileRepo + ?Sized,
{
    let identity = identity.ok_or(GuardError::Unauthenticated)?;

    match store.profile(identity.id).await {
        Ok(Some(profile)) if profile.is_admin => Ok(profile),
        Ok(_) => Err(GuardError::Forbidden),
        Err(e) => {
            warn!(error = %e, "Profile lookup failed during admin check");
            Err(GuardError::Forbidden)
        }
    }
}
