//! Port for one-way secret hashing.
//!
//! Verification must be constant-time with respect to the secret. The decoy
//! check lets callers spend the same work on an unknown identity as on a
//! known one.
use async_trait::async_trait;

use crate::domain::SecretHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by secret hashers.
    pub enum SecretHasherError {
        /// Hashing failed or the stored hash could not be parsed.
        Hash { message: String } => "secret hashing failed: {message}",
    }
}

/// Salted one-way hashing of account secrets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretHasher: Send + Sync {
    /// Hash `secret` with a fresh salt.
    async fn hash(&self, secret: &str) -> Result<SecretHash, SecretHasherError>;

    /// Check `secret` against a stored hash.
    async fn verify(&self, secret: &str, hash: &SecretHash) -> Result<bool, SecretHasherError>;

    /// Run a full verification against an internal decoy hash and discard the
    /// outcome.
    async fn verify_decoy(&self, secret: &str);
}
