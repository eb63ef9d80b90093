//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the use-case services that operate on them, and the ports that
//! separate both from infrastructure.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload and stable code.
//! - Account, Identity, DisplayName: registered users and their identity.
//! - BearerToken, AccessToken, TokenPolicy: opaque token issuance.
//! - Book, BookDraft, BookChanges: the owned resource.
//! - AccountCredentialService, TokenResourceGuard, BookService: services
//!   implementing the driving ports in [`ports`].

pub mod account;
pub mod auth;
pub mod book;
mod book_service;
mod credential_service;
pub mod error;
pub mod ports;
mod resource_guard;
pub mod token;
pub mod trace_id;
pub mod validation;

pub use self::account::{
    Account, AccountId, AccountValidationError, DisplayName, Identity, SecretHash, StoredAccount,
};
pub use self::auth::{
    LoginCredentials, LoginValidationError, MIN_SECRET_LENGTH, Registration,
    RegistrationValidationError,
};
pub use self::book::{
    Author, Book, BookChanges, BookDraft, BookId, BookValidationError, Isbn, OwnedResource,
    PublishedYear, Title,
};
pub use self::book_service::BookService;
pub use self::credential_service::AccountCredentialService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::resource_guard::{TokenResourceGuard, ensure_owner};
pub use self::token::{AccessToken, BearerToken, TokenDigest, TokenPolicy};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{FieldViolation, validation_error};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bookshelf::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
