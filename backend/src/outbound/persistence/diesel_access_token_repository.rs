//! PostgreSQL-backed `AccessTokenRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccessTokenPersistenceError, AccessTokenRepository};
use crate::domain::{AccessToken, AccountId, TokenDigest};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::AccessTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::access_tokens;

/// Diesel-backed implementation of the `AccessTokenRepository` port.
#[derive(Clone)]
pub struct DieselAccessTokenRepository {
    pool: DbPool,
}

impl DieselAccessTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccessTokenPersistenceError {
    AccessTokenPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> AccessTokenPersistenceError {
    match classify_diesel_error(&error) {
        (DieselFailure::Connection, message) => AccessTokenPersistenceError::connection(message),
        (DieselFailure::UniqueViolation | DieselFailure::Query, message) => {
            AccessTokenPersistenceError::query(message)
        }
    }
}

impl From<&AccessToken> for AccessTokenRow {
    fn from(token: &AccessToken) -> Self {
        Self {
            digest: token.digest.as_str().to_owned(),
            account_id: *token.account_id.as_uuid(),
            created_at: token.created_at,
            expires_at: token.expires_at,
        }
    }
}

impl From<AccessTokenRow> for AccessToken {
    fn from(row: AccessTokenRow) -> Self {
        Self {
            digest: TokenDigest::from_hex(row.digest),
            account_id: AccountId::from_uuid(row.account_id),
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl AccessTokenRepository for DieselAccessTokenRepository {
    async fn store(&self, token: &AccessToken) -> Result<(), AccessTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(access_tokens::table)
            .values(AccessTokenRow::from(token))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_digest(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AccessToken>, AccessTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = access_tokens::table
            .find(digest.as_str())
            .select(AccessTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(AccessToken::from))
    }
}
