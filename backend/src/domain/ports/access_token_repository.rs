//! Port abstraction for bearer token storage.
use async_trait::async_trait;

use crate::domain::{AccessToken, TokenDigest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by access token adapters.
    pub enum AccessTokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

/// Storage for issued tokens, keyed by digest.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Persist a freshly issued token record.
    async fn store(&self, token: &AccessToken) -> Result<(), AccessTokenPersistenceError>;

    /// Look up a token record by its digest.
    async fn find_by_digest(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AccessToken>, AccessTokenPersistenceError>;
}
