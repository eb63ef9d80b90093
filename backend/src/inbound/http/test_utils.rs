//! Test helpers for inbound HTTP components.
//!
//! [`TestHarness`] wires the real domain services over an in-memory store
//! with minimal Argon2 cost and a controllable clock, so handler tests run
//! the same code paths as the server without a database.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use rstest::fixture;

use crate::domain::ports::IssuedCredentials;
use crate::domain::{
    AccountCredentialService, BookService, Registration, TokenPolicy, TokenResourceGuard,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::outbound::crypto::{Argon2SecretHasher, HashingCost};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::MutableClock;

/// Token lifetime used by the harness.
pub const TEST_TOKEN_TTL_MINUTES: u32 = 60;

/// Password used for every account registered by the harness.
pub const TEST_PASSWORD: &str = "pw123456";

/// Domain services over an in-memory store.
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    state: web::Data<HttpState>,
}

impl TestHarness {
    /// Build a harness with a fresh store and a clock at the fixture time.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let clock = Arc::new(MutableClock::at_fixture_time());
        let hasher =
            Arc::new(Argon2SecretHasher::new(HashingCost::testing()).expect("testing cost"));
        let credentials = AccountCredentialService::new(
            store.clone(),
            store.clone(),
            hasher,
            clock.clone(),
            TokenPolicy::from_minutes(TEST_TOKEN_TTL_MINUTES),
        );
        let guard = TokenResourceGuard::new(store.clone(), store.clone(), clock.clone());
        let books = Arc::new(BookService::new(store.clone(), clock.clone()));
        let state = HttpState::new(
            Arc::new(credentials),
            Arc::new(guard),
            books.clone(),
            books,
        );
        Self {
            store,
            clock,
            state: web::Data::new(state),
        }
    }

    /// Shared HTTP state for `App::app_data`.
    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    /// Register an account named after its email, with [`TEST_PASSWORD`].
    pub async fn register(&self, email: &str) -> IssuedCredentials {
        let registration =
            Registration::try_from_parts(email, email, TEST_PASSWORD, None).expect("registration");
        self.state
            .credentials
            .register(registration)
            .await
            .expect("register succeeds")
    }

    /// Full API application mounted under `/api/v1`.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state())
            .wrap(crate::Trace)
            .service(web::scope("/api/v1").configure(configure_api))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh [`TestHarness`] per test.
#[fixture]
pub fn harness() -> TestHarness {
    TestHarness::new()
}
