//! Account data model.
//!
//! An account is identified internally by a UUID and externally by its
//! identity (an email address). The secret hash lives beside the account in
//! [`StoredAccount`] so it never travels with the public [`Account`] value.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::FieldViolation;

/// Maximum length for display names and identities.
pub const ACCOUNT_FIELD_MAX: usize = 255;

/// Validation errors raised by account value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    EmptyIdentity,
    IdentityTooLong { max: usize },
    MalformedIdentity,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "account id must not be empty"),
            Self::InvalidId => write!(f, "account id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyIdentity => write!(f, "email must not be empty"),
            Self::IdentityTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::MalformedIdentity => write!(f, "email must be a valid email address"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

impl FieldViolation for AccountValidationError {
    fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyId | Self::InvalidId => Some("id"),
            Self::EmptyName | Self::NameTooLong { .. } => Some("name"),
            Self::EmptyIdentity | Self::IdentityTooLong { .. } | Self::MalformedIdentity => {
                Some("email")
            }
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::EmptyName | Self::EmptyIdentity => "empty",
            Self::NameTooLong { .. } | Self::IdentityTooLong { .. } => "too_long",
            Self::InvalidId | Self::MalformedIdentity => "malformed",
        }
    }
}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(Uuid);

impl AccountId {
    /// Validate and construct an [`AccountId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Generate a new random [`AccountId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable account name.
///
/// ## Invariants
/// - Non-empty once trimmed; stored trimmed.
/// - At most [`ACCOUNT_FIELD_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        if trimmed.chars().count() > ACCOUNT_FIELD_MAX {
            return Err(AccountValidationError::NameTooLong {
                max: ACCOUNT_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login identity: a normalised email address.
///
/// ## Invariants
/// - Trimmed and lower-cased, so lookups are case-insensitive.
/// - `local@domain.tld`: the local part has no whitespace, quotes, or angle
///   brackets; the domain is two or more non-empty labels separated by dots,
///   none starting or ending with a hyphen.
/// - At most [`ACCOUNT_FIELD_MAX`] characters.
///
/// # Examples
/// ```
/// use bookshelf::domain::Identity;
///
/// let identity = Identity::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(identity.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Validate, normalise, and construct an [`Identity`].
    pub fn new(identity: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = identity.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyIdentity);
        }
        if normalised.chars().count() > ACCOUNT_FIELD_MAX {
            return Err(AccountValidationError::IdentityTooLong {
                max: ACCOUNT_FIELD_MAX,
            });
        }
        if !email_regex().is_match(&normalised) {
            return Err(AccountValidationError::MalformedIdentity);
        }
        Ok(Self(normalised))
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Input is lower-cased first. Domain labels are alphanumeric runs that
        // may contain inner hyphens, and at least two labels are required.
        let pattern = concat!(
            r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+",
            r"@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?",
            r"(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+$",
        );
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl TryFrom<String> for Identity {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// PHC-format secret hash produced by a [`crate::domain::ports::SecretHasher`].
///
/// Deliberately not `Serialize`: the hash never leaves the persistence
/// boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash(..)")
    }
}

/// Registered account as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: AccountId,
    name: DisplayName,
    #[serde(rename = "email")]
    identity: Identity,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Build an [`Account`] from validated components.
    pub fn new(
        id: AccountId,
        name: DisplayName,
        identity: Identity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            identity,
            created_at,
        }
    }

    /// Stable account identifier.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Login identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Account together with its secret hash, as held by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub account: Account,
    pub secret_hash: SecretHash,
}
