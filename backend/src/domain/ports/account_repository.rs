//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Account, AccountId, Identity, StoredAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Another account already uses the identity.
        DuplicateIdentity => "an account with this identity already exists",
    }
}

/// Storage for registered accounts and their secret hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account and its secret hash by normalised identity.
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError>;

    /// Insert a new account.
    ///
    /// Fails with [`AccountPersistenceError::DuplicateIdentity`] when the
    /// identity is taken, including when a concurrent insert wins the race.
    async fn create(&self, account: &StoredAccount) -> Result<(), AccountPersistenceError>;
}
