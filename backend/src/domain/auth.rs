//! Credential payloads accepted by the credential service.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::account::{AccountValidationError, DisplayName, Identity};
use super::validation::FieldViolation;

/// Shortest secret accepted at registration.
pub const MIN_SECRET_LENGTH: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Identity was missing or blank once trimmed.
    EmptyIdentity,
    /// Secret was blank.
    EmptySecret,
}

impl FieldViolation for LoginValidationError {
    fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyIdentity => Some("email"),
            Self::EmptySecret => Some("password"),
        }
    }

    fn reason(&self) -> &'static str {
        "empty"
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentity => write!(f, "email must not be empty"),
            Self::EmptySecret => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the credential service.
///
/// ## Invariants
/// - `identity` is trimmed, lower-cased, and non-empty.
/// - `secret` is non-empty but keeps caller-provided whitespace so the
///   comparison sees exactly what was registered.
///
/// # Examples
/// ```
/// use bookshelf::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" A@X.com ", "pw123456").expect("valid");
/// assert_eq!(creds.identity(), "a@x.com");
/// assert_eq!(creds.secret(), "pw123456");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identity: String,
    secret: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identity/secret inputs.
    pub fn try_from_parts(identity: &str, secret: &str) -> Result<Self, LoginValidationError> {
        let normalised = identity.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyIdentity);
        }

        if secret.is_empty() {
            return Err(LoginValidationError::EmptySecret);
        }

        Ok(Self {
            identity: normalised,
            secret: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Normalised identity suitable for account lookups.
    pub fn identity(&self) -> &str {
        self.identity.as_str()
    }

    /// Secret provided by the caller.
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Errors raised while validating a registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    Account(AccountValidationError),
    SecretTooShort { min: usize },
    ConfirmationMismatch,
}

impl FieldViolation for RegistrationValidationError {
    fn field(&self) -> Option<&'static str> {
        match self {
            Self::Account(err) => err.field(),
            Self::SecretTooShort { .. } => Some("password"),
            Self::ConfirmationMismatch => Some("passwordConfirmation"),
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::Account(err) => err.reason(),
            Self::SecretTooShort { .. } => "too_short",
            Self::ConfirmationMismatch => "mismatch",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(err) => err.fmt(f),
            Self::SecretTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::ConfirmationMismatch => write!(f, "password confirmation does not match"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<AccountValidationError> for RegistrationValidationError {
    fn from(value: AccountValidationError) -> Self {
        Self::Account(value)
    }
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use bookshelf::domain::Registration;
///
/// let registration =
///     Registration::try_from_parts("Ada", "a@x.com", "pw123456", Some("pw123456"))
///         .expect("valid registration");
/// assert_eq!(registration.identity().as_ref(), "a@x.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    identity: Identity,
    secret: Zeroizing<String>,
}

impl Registration {
    /// Validate the registration fields in form order: name, identity,
    /// secret, confirmation.
    pub fn try_from_parts(
        name: &str,
        identity: &str,
        secret: &str,
        confirmation: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let name = DisplayName::new(name)?;
        let identity = Identity::new(identity)?;
        if secret.chars().count() < MIN_SECRET_LENGTH {
            return Err(RegistrationValidationError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
            });
        }
        if confirmation.is_some_and(|value| value != secret) {
            return Err(RegistrationValidationError::ConfirmationMismatch);
        }
        Ok(Self {
            name,
            identity,
            secret: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Identity the account will log in with.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Plaintext secret, zeroised on drop.
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
