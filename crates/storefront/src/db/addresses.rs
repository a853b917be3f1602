//! Address repository.
//!
//! Every operation is scoped by owner. Writes that set `is_default` clear the
//! owner's other defaults in the same transaction, under a transaction-level
//! advisory lock keyed by the owner, so two concurrent default writes for one
//! owner serialize instead of both winning.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use fitova_core::{AddressId, UserId};

use super::{PgStore, RepositoryError};
use crate::models::{Address, NewAddress};

/// Owner-scoped address operations.
#[async_trait]
pub trait AddressRepo: Send + Sync {
    /// All addresses of `owner`, default first, then newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn addresses(&self, owner: UserId) -> Result<Vec<Address>, RepositoryError>;

    /// Insert an address for `owner`; a default address demotes the others.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any step fails; nothing is applied then.
    async fn insert_address(
        &self,
        owner: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError>;

    /// Replace the fields of one of `owner`'s addresses.
    ///
    /// Returns `None` when no address with `id` belongs to `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any step fails; nothing is applied then.
    async fn update_address(
        &self,
        owner: UserId,
        id: AddressId,
        address: &NewAddress,
    ) -> Result<Option<Address>, RepositoryError>;

    /// Delete one of `owner`'s addresses. Matches on both id and owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    async fn delete_address(&self, owner: UserId, id: AddressId) -> Result<bool, RepositoryError>;

    /// Make `id` the owner's only default address.
    ///
    /// Returns `false` when no address with `id` belongs to `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any step fails; nothing is applied then.
    async fn set_default_address(
        &self,
        owner: UserId,
        id: AddressId,
    ) -> Result<bool, RepositoryError>;
}

const ADDRESS_COLUMNS: &str = "id, user_id, label, full_name, phone, line1, line2, city, state, \
     postal_code, country, is_default, created_at, updated_at";

/// Take the per-owner lock and clear existing defaults (optionally sparing one row).
async fn clear_defaults(
    tx: &mut Transaction<'_, Postgres>,
    owner: UserId,
    except: Option<AddressId>,
) -> Result<(), RepositoryError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(owner)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r"
        UPDATE addresses
        SET is_default = FALSE, updated_at = NOW()
        WHERE user_id = $1 AND is_default AND ($2::uuid IS NULL OR id <> $2)
        ",
    )
    .bind(owner)
    .bind(except)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl AddressRepo for PgStore {
    async fn addresses(&self, owner: UserId) -> Result<Vec<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 \
             ORDER BY is_default DESC, created_at DESC"
        );
        let rows = sqlx::query_as::<_, Address>(&sql)
            .bind(owner)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    async fn insert_address(
        &self,
        owner: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        if address.is_default {
            clear_defaults(&mut tx, owner, None).await?;
        }

        let sql = format!(
            r"
            INSERT INTO addresses
                (user_id, label, full_name, phone, line1, line2, city, state,
                 postal_code, country, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ADDRESS_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(owner)
            .bind(address.label.as_deref())
            .bind(&address.full_name)
            .bind(address.phone.as_deref())
            .bind(&address.line1)
            .bind(address.line2.as_deref())
            .bind(&address.city)
            .bind(address.state.as_deref())
            .bind(&address.postal_code)
            .bind(&address.country)
            .bind(address.is_default)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn update_address(
        &self,
        owner: UserId,
        id: AddressId,
        address: &NewAddress,
    ) -> Result<Option<Address>, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        if address.is_default {
            clear_defaults(&mut tx, owner, Some(id)).await?;
        }

        let sql = format!(
            r"
            UPDATE addresses
            SET label = $3, full_name = $4, phone = $5, line1 = $6, line2 = $7,
                city = $8, state = $9, postal_code = $10, country = $11,
                is_default = $12, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {ADDRESS_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .bind(owner)
            .bind(address.label.as_deref())
            .bind(&address.full_name)
            .bind(address.phone.as_deref())
            .bind(&address.line1)
            .bind(address.line2.as_deref())
            .bind(&address.city)
            .bind(address.state.as_deref())
            .bind(&address.postal_code)
            .bind(&address.country)
            .bind(address.is_default)
            .fetch_optional(&mut *tx)
            .await?;

        // Dropping the transaction on a miss rolls back the cleared defaults.
        if row.is_some() {
            tx.commit().await?;
        }
        Ok(row)
    }

    async fn delete_address(&self, owner: UserId, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_default_address(
        &self,
        owner: UserId,
        id: AddressId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool().begin().await?;
        clear_defaults(&mut tx, owner, Some(id)).await?;

        let result = sqlx::query(
            r"
            UPDATE addresses
            SET is_default = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
