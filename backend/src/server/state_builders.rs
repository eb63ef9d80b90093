//! Builders wiring domain services onto the configured storage backend.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use bookshelf::domain::ports::{AccessTokenRepository, AccountRepository, BookRepository};
use bookshelf::domain::{AccountCredentialService, BookService, TokenPolicy, TokenResourceGuard};
use bookshelf::inbound::http::state::HttpState;
use bookshelf::outbound::crypto::{Argon2SecretHasher, HashingCost};
use bookshelf::outbound::memory::InMemoryStore;
use bookshelf::outbound::persistence::{
    DbPool, DieselAccessTokenRepository, DieselAccountRepository, DieselBookRepository,
    run_migrations,
};

use super::ServerSettings;

/// Assemble the HTTP state over one set of repositories.
fn assemble<A, T, B>(
    accounts: Arc<A>,
    tokens: Arc<T>,
    books: Arc<B>,
    hasher: Arc<Argon2SecretHasher>,
    policy: TokenPolicy,
) -> HttpState
where
    A: AccountRepository + 'static,
    T: AccessTokenRepository + 'static,
    B: BookRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let credentials = AccountCredentialService::new(
        accounts.clone(),
        tokens.clone(),
        hasher,
        clock.clone(),
        policy,
    );
    let guard = TokenResourceGuard::new(accounts, tokens, clock.clone());
    let book_service = Arc::new(BookService::new(books, clock));
    HttpState::new(
        Arc::new(credentials),
        Arc::new(guard),
        book_service.clone(),
        book_service,
    )
}

/// Build the shared HTTP state from settings.
///
/// Uses the Diesel adapters when a database URL is configured, applying
/// migrations first unless told to skip them. Otherwise falls back to the
/// in-memory store, which loses all data on restart.
///
/// # Errors
/// Returns [`std::io::Error`] when the hasher parameters are rejected,
/// migrations fail, or the pool cannot be built.
pub(super) async fn build_http_state(
    settings: &ServerSettings,
) -> std::io::Result<web::Data<HttpState>> {
    let hasher = Arc::new(
        Argon2SecretHasher::new(HashingCost::default())
            .map_err(|err| std::io::Error::other(format!("secret hasher setup failed: {err}")))?,
    );
    let policy = settings.token_policy();

    let state = match settings.pool_config() {
        Some(pool_config) => {
            if settings.skip_migrations {
                info!("skipping database migrations");
            } else {
                run_migrations(pool_config.database_url())
                    .await
                    .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
            }
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))?;
            info!("using PostgreSQL persistence");
            assemble(
                Arc::new(DieselAccountRepository::new(pool.clone())),
                Arc::new(DieselAccessTokenRepository::new(pool.clone())),
                Arc::new(DieselBookRepository::new(pool)),
                hasher,
                policy,
            )
        }
        None => {
            warn!("no database URL configured; data is kept in memory and lost on restart");
            let store = Arc::new(InMemoryStore::default());
            assemble(store.clone(), store.clone(), store, hasher, policy)
        }
    };
    Ok(web::Data::new(state))
}
