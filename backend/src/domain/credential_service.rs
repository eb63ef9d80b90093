//! Credential service: registration, login, and token issuance.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    AccessTokenPersistenceError, AccessTokenRepository, AccountPersistenceError,
    AccountRepository, CredentialService, IssuedCredentials, SecretHasher, SecretHasherError,
};
use crate::domain::{
    Account, AccountId, BearerToken, Error, Identity, LoginCredentials, Registration,
    StoredAccount, TokenPolicy,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

pub(crate) fn map_account_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::DuplicateIdentity => {
            Error::duplicate_identity("an account with this email already exists")
                .with_details(json!({ "field": "email", "code": "taken" }))
        }
        AccountPersistenceError::Connection { message }
        | AccountPersistenceError::Query { message } => {
            debug!(%message, "account repository failure");
            Error::server_fault(format!("account repository failure: {message}"))
        }
    }
}

pub(crate) fn map_token_error(error: AccessTokenPersistenceError) -> Error {
    let (AccessTokenPersistenceError::Connection { message }
    | AccessTokenPersistenceError::Query { message }) = error;
    debug!(%message, "token repository failure");
    Error::server_fault(format!("token repository failure: {message}"))
}

fn map_hasher_error(error: SecretHasherError) -> Error {
    debug!(%error, "secret hasher failure");
    Error::server_fault(error.to_string())
}

/// Credential service backed by account and token repositories.
#[derive(Clone)]
pub struct AccountCredentialService<A, T, H> {
    accounts: Arc<A>,
    tokens: Arc<T>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    policy: TokenPolicy,
}

impl<A, T, H> AccountCredentialService<A, T, H> {
    /// Create a new service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use bookshelf::domain::{AccountCredentialService, TokenPolicy};
    /// # use bookshelf::outbound::crypto::{Argon2SecretHasher, HashingCost};
    /// # use bookshelf::outbound::memory::InMemoryStore;
    /// # use mockable::DefaultClock;
    /// let store = Arc::new(InMemoryStore::default());
    /// let service = AccountCredentialService::new(
    ///     store.clone(),
    ///     store,
    ///     Arc::new(Argon2SecretHasher::new(HashingCost::default()).expect("valid cost")),
    ///     Arc::new(DefaultClock),
    ///     TokenPolicy::default(),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        accounts: Arc<A>,
        tokens: Arc<T>,
        hasher: Arc<H>,
        clock: Arc<dyn Clock>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            accounts,
            tokens,
            hasher,
            clock,
            policy,
        }
    }
}

impl<A, T, H> AccountCredentialService<A, T, H>
where
    A: AccountRepository,
    T: AccessTokenRepository,
    H: SecretHasher,
{
    async fn issue(&self, account: Account) -> Result<IssuedCredentials, Error> {
        let token = BearerToken::mint();
        let record = self.policy.issue(&token, *account.id(), self.clock.utc());
        self.tokens.store(&record).await.map_err(map_token_error)?;
        Ok(IssuedCredentials { account, token })
    }

    async fn reject_unknown(&self, secret: &str) -> Error {
        self.hasher.verify_decoy(secret).await;
        Error::invalid_credentials(INVALID_CREDENTIALS)
    }
}

#[async_trait]
impl<A, T, H> CredentialService for AccountCredentialService<A, T, H>
where
    A: AccountRepository,
    T: AccessTokenRepository,
    H: SecretHasher,
{
    async fn register(&self, registration: Registration) -> Result<IssuedCredentials, Error> {
        let existing = self
            .accounts
            .find_by_identity(registration.identity())
            .await
            .map_err(map_account_error)?;
        if existing.is_some() {
            return Err(map_account_error(AccountPersistenceError::duplicate_identity()));
        }

        let secret_hash = self
            .hasher
            .hash(registration.secret())
            .await
            .map_err(map_hasher_error)?;
        let account = Account::new(
            AccountId::random(),
            registration.name().clone(),
            registration.identity().clone(),
            self.clock.utc(),
        );
        let stored = StoredAccount {
            account,
            secret_hash,
        };
        self.accounts
            .create(&stored)
            .await
            .map_err(map_account_error)?;

        self.issue(stored.account).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedCredentials, Error> {
        let Ok(identity) = Identity::new(credentials.identity()) else {
            return Err(self.reject_unknown(credentials.secret()).await);
        };
        let stored = self
            .accounts
            .find_by_identity(&identity)
            .await
            .map_err(map_account_error)?;
        let Some(StoredAccount {
            account,
            secret_hash,
        }) = stored
        else {
            return Err(self.reject_unknown(credentials.secret()).await);
        };

        let matches = self
            .hasher
            .verify(credentials.secret(), &secret_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        self.issue(account).await
    }
}
