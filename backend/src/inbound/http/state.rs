//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BookCommand, BookQuery, CredentialService, ResourceGuard};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialService>,
    pub guard: Arc<dyn ResourceGuard>,
    pub books: Arc<dyn BookCommand>,
    pub books_query: Arc<dyn BookQuery>,
}

impl HttpState {
    /// Construct state from its port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use bookshelf::domain::{
    ///     AccountCredentialService, BookService, TokenPolicy, TokenResourceGuard,
    /// };
    /// use bookshelf::inbound::http::state::HttpState;
    /// use bookshelf::outbound::crypto::{Argon2SecretHasher, HashingCost};
    /// use bookshelf::outbound::memory::InMemoryStore;
    /// use mockable::{Clock, DefaultClock};
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    /// let hasher = Arc::new(Argon2SecretHasher::new(HashingCost::default()).expect("cost"));
    /// let books = Arc::new(BookService::new(store.clone(), clock.clone()));
    /// let state = HttpState::new(
    ///     Arc::new(AccountCredentialService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         hasher,
    ///         clock.clone(),
    ///         TokenPolicy::default(),
    ///     )),
    ///     Arc::new(TokenResourceGuard::new(store.clone(), store, clock)),
    ///     books.clone(),
    ///     books,
    /// );
    /// let _guard = state.guard.clone();
    /// ```
    pub fn new(
        credentials: Arc<dyn CredentialService>,
        guard: Arc<dyn ResourceGuard>,
        books: Arc<dyn BookCommand>,
        books_query: Arc<dyn BookQuery>,
    ) -> Self {
        Self {
            credentials,
            guard,
            books,
            books_query,
        }
    }
}
