//! Driving port for registration and login.
//!
//! Inbound adapters call it to exchange credentials for a bearer token
//! without knowing how accounts, hashes, or tokens are stored.

use async_trait::async_trait;

use crate::domain::{Account, BearerToken, Error, LoginCredentials, Registration};

/// Account plus the plaintext token just minted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredentials {
    pub account: Account,
    pub token: BearerToken,
}

/// Domain use-case port for credential exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Create an account and issue its first token.
    async fn register(&self, registration: Registration) -> Result<IssuedCredentials, Error>;

    /// Verify credentials and issue a fresh token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedCredentials, Error>;
}
