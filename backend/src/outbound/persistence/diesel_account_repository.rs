//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{
    Account, AccountId, DisplayName, Identity, SecretHash, StoredAccount,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    AccountPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> AccountPersistenceError {
    match classify_diesel_error(&error) {
        (DieselFailure::UniqueViolation, _) => AccountPersistenceError::duplicate_identity(),
        (DieselFailure::Connection, message) => AccountPersistenceError::connection(message),
        (DieselFailure::Query, message) => AccountPersistenceError::query(message),
    }
}

/// Convert a row into an account, rejecting values that no longer validate.
fn row_to_stored(row: AccountRow) -> Result<StoredAccount, AccountPersistenceError> {
    let AccountRow {
        id,
        name,
        email,
        secret_hash,
        created_at,
    } = row;
    let invalid = |field: &str, err: crate::domain::AccountValidationError| {
        warn!(account_id = %id, field, %err, "stored account failed validation");
        AccountPersistenceError::query(format!("stored account has invalid {field}"))
    };
    let name = DisplayName::new(name).map_err(|err| invalid("name", err))?;
    let identity = Identity::new(email).map_err(|err| invalid("email", err))?;
    Ok(StoredAccount {
        account: Account::new(AccountId::from_uuid(id), name, identity, created_at),
        secret_hash: SecretHash::new(secret_hash),
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = accounts::table
            .filter(accounts::email.eq(identity.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_stored).transpose()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = accounts::table
            .find(*id.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row
            .map(row_to_stored)
            .transpose()?
            .map(|stored| stored.account))
    }

    async fn create(&self, stored: &StoredAccount) -> Result<(), AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let account = &stored.account;
        let new_row = NewAccountRow {
            id: *account.id().as_uuid(),
            name: account.name().as_ref(),
            email: account.identity().as_ref(),
            secret_hash: stored.secret_hash.as_str(),
            created_at: account.created_at(),
        };
        diesel::insert_into(accounts::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
