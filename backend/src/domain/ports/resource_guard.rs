//! Driving port resolving bearer tokens and checking ownership.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, BearerToken, Error};

/// Token resolution and owner checks applied before touching owned data.
#[async_trait]
pub trait ResourceGuard: Send + Sync {
    /// Resolve a presented token to its account.
    ///
    /// Fails with `Unauthenticated` when the token is missing, unknown,
    /// expired, or its account no longer exists.
    async fn authenticate(&self, token: Option<&BearerToken>) -> Result<Account, Error>;

    /// Authenticate, then require that the account owns the resource whose
    /// owner is `owner_id`. Fails with `Forbidden` on mismatch.
    ///
    /// Single-call form for callers that already hold the owner id. The book
    /// endpoints split the two steps: the `Authenticated` extractor calls
    /// [`Self::authenticate`], and `BookService` loads the book before
    /// applying the same owner rule through `ensure_owner`, so an unknown id
    /// reports `NotFound` rather than `Forbidden`.
    async fn authorize(
        &self,
        token: Option<&BearerToken>,
        owner_id: &AccountId,
    ) -> Result<Account, Error>;
}
