//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`SecretHasher`]) are implemented by outbound
//! adapters. Driving ports ([`CredentialService`], [`ResourceGuard`],
//! [`BookCommand`], [`BookQuery`]) are implemented by domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_repository;
mod account_repository;
mod book_command;
mod book_query;
mod book_repository;
mod credential_service;
mod resource_guard;
mod secret_hasher;

#[cfg(test)]
pub use access_token_repository::MockAccessTokenRepository;
pub use access_token_repository::{AccessTokenPersistenceError, AccessTokenRepository};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
pub use book_command::BookCommand;
#[cfg(test)]
pub use book_command::MockBookCommand;
pub use book_query::BookQuery;
#[cfg(test)]
pub use book_query::MockBookQuery;
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookPersistenceError, BookRepository, BookSlice};
pub use credential_service::{CredentialService, IssuedCredentials};
#[cfg(test)]
pub use credential_service::MockCredentialService;
pub use resource_guard::ResourceGuard;
#[cfg(test)]
pub use secret_hasher::MockSecretHasher;
pub use secret_hasher::{SecretHasher, SecretHasherError};
