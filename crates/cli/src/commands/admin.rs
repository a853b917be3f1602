//! Admin flag management.
//!
//! Accounts are created through `POST /auth/register`; these commands only
//! flip `profiles.is_admin` on an existing account.
//!
//! # Environment Variables
//!
//! - `FITOVA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use secrecy::ExposeSecret;
use sqlx::PgPool;

use fitova_core::Email;

use super::{CommandError, database_url};

/// Set or clear the admin flag for the account with `email`.
///
/// # Errors
///
/// Returns `CommandError::UnknownAccount` if no profile has that email.
pub async fn set_admin(email: &str, is_admin: bool) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let result = sqlx::query(
        r"
        UPDATE profiles
        SET is_admin = $2, updated_at = NOW()
        WHERE email = $1
        ",
    )
    .bind(email.as_str())
    .bind(is_admin)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CommandError::UnknownAccount(email.to_string()));
    }

    if is_admin {
        tracing::info!(email = %email, "Admin flag granted");
    } else {
        tracing::info!(email = %email, "Admin flag revoked");
    }
    Ok(())
}
