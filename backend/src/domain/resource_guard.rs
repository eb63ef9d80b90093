//! Resource guard: resolves bearer tokens and compares owners.
//!
//! Decisions are made fresh against the stored snapshot on every call; the
//! guard holds no state of its own.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::credential_service::{map_account_error, map_token_error};
use crate::domain::ports::{AccessTokenRepository, AccountRepository, ResourceGuard};
use crate::domain::{Account, AccountId, BearerToken, Error, OwnedResource};

const UNAUTHENTICATED: &str = "a valid bearer token is required";

/// Require that `account` owns `resource`.
///
/// # Examples
/// ```
/// use bookshelf::domain::{
///     Account, AccountId, Book, BookDraft, DisplayName, ErrorCode, Identity, ensure_owner,
/// };
/// use chrono::Utc;
///
/// let account = Account::new(
///     AccountId::random(),
///     DisplayName::new("Ada").expect("name"),
///     Identity::new("a@x.com").expect("email"),
///     Utc::now(),
/// );
/// let draft = BookDraft::try_from_parts("Dune", "Herbert", None, None).expect("draft");
/// let own = Book::create(draft.clone(), *account.id(), Utc::now());
/// let other = Book::create(draft, AccountId::random(), Utc::now());
/// assert!(ensure_owner(&account, &own).is_ok());
/// assert_eq!(ensure_owner(&account, &other).map_err(|e| e.code()), Err(ErrorCode::Forbidden));
/// ```
pub fn ensure_owner(account: &Account, resource: &impl OwnedResource) -> Result<(), Error> {
    ensure_owner_id(account, resource.owner_id())
}

fn ensure_owner_id(account: &Account, owner_id: &AccountId) -> Result<(), Error> {
    if account.id() == owner_id {
        Ok(())
    } else {
        Err(Error::forbidden(
            "this resource belongs to another account",
        ))
    }
}

/// Guard backed by the token and account repositories.
#[derive(Clone)]
pub struct TokenResourceGuard<A, T> {
    accounts: Arc<A>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<A, T> TokenResourceGuard<A, T> {
    /// Create a guard over the given repositories.
    pub fn new(accounts: Arc<A>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            tokens,
            clock,
        }
    }
}

#[async_trait]
impl<A, T> ResourceGuard for TokenResourceGuard<A, T>
where
    A: AccountRepository,
    T: AccessTokenRepository,
{
    async fn authenticate(&self, token: Option<&BearerToken>) -> Result<Account, Error> {
        let Some(token) = token else {
            return Err(Error::unauthenticated(UNAUTHENTICATED));
        };
        let record = self
            .tokens
            .find_by_digest(&token.digest())
            .await
            .map_err(map_token_error)?;
        let Some(record) = record else {
            debug!("unknown bearer token presented");
            return Err(Error::unauthenticated(UNAUTHENTICATED));
        };
        if record.is_expired_at(self.clock.utc()) {
            debug!(account_id = %record.account_id, "expired bearer token presented");
            return Err(Error::unauthenticated(UNAUTHENTICATED));
        }
        self.accounts
            .find_by_id(&record.account_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthenticated(UNAUTHENTICATED))
    }

    async fn authorize(
        &self,
        token: Option<&BearerToken>,
        owner_id: &AccountId,
    ) -> Result<Account, Error> {
        let account = self.authenticate(token).await?;
        ensure_owner_id(&account, owner_id)?;
        Ok(account)
    }
}
