//! Opaque bearer tokens.
//!
//! A token is 32 bytes from the operating system RNG, hex encoded. Only its
//! SHA-256 digest is persisted; the plaintext goes back to the client once and
//! is then forgotten.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::account::AccountId;

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 32;

/// Plaintext bearer token as issued to, or presented by, a client.
///
/// The value is zeroised on drop and hidden from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Mint a fresh, unguessable token.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::BearerToken;
    ///
    /// let token = BearerToken::mint();
    /// assert_eq!(token.expose().len(), 64);
    /// assert_ne!(token, BearerToken::mint());
    /// ```
    pub fn mint() -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        OsRng.fill_bytes(&mut bytes[..]);
        Self(Zeroizing::new(hex::encode(&bytes[..])))
    }

    /// Wrap a token presented by a client. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Plaintext value, for returning to the client that owns it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest under which the token is stored.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Hex-encoded SHA-256 digest of a [`BearerToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest read back from storage.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Hex representation.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored token record binding a digest to exactly one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub digest: TokenDigest,
    pub account_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whether the token is unusable at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

/// Lifetime applied to newly issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    ttl: Option<Duration>,
}

impl TokenPolicy {
    /// Seven days, expressed in minutes.
    pub const DEFAULT_TTL_MINUTES: u32 = 10_080;

    /// Build a policy from a lifetime in minutes; `0` disables expiry.
    pub fn from_minutes(minutes: u32) -> Self {
        let ttl = (minutes > 0).then(|| Duration::minutes(i64::from(minutes)));
        Self { ttl }
    }

    /// Policy whose tokens never expire.
    pub fn never_expires() -> Self {
        Self { ttl: None }
    }

    /// Record for `token`, issued to `account_id` at `now`.
    pub fn issue(
        &self,
        token: &BearerToken,
        account_id: AccountId,
        now: DateTime<Utc>,
    ) -> AccessToken {
        AccessToken {
            digest: token.digest(),
            account_id,
            created_at: now,
            expires_at: self.ttl.map(|ttl| now + ttl),
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::from_minutes(Self::DEFAULT_TTL_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn minted_tokens_are_hex_and_distinct() {
        let first = BearerToken::mint();
        let second = BearerToken::mint();
        assert_eq!(first.expose().len(), TOKEN_BYTES * 2);
        assert!(first.expose().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[rstest]
    fn digest_is_stable_and_hides_the_plaintext() {
        let token = BearerToken::parse("abc").expect("non-blank token");
        assert_eq!(
            token.digest().as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(format!("{token:?}"), "BearerToken(..)");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_tokens_are_rejected(#[case] raw: &str) {
        assert!(BearerToken::parse(raw).is_none());
    }

    #[rstest]
    #[case(0, None)]
    #[case(60, Some(Duration::minutes(60)))]
    fn policy_sets_expiry_from_minutes(#[case] minutes: u32, #[case] ttl: Option<Duration>) {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let record = TokenPolicy::from_minutes(minutes).issue(
            &BearerToken::mint(),
            AccountId::random(),
            now,
        );
        assert_eq!(record.expires_at, ttl.map(|ttl| now + ttl));
    }

    #[rstest]
    fn expiry_is_inclusive_of_the_deadline() {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        let record = TokenPolicy::from_minutes(1).issue(&BearerToken::mint(), AccountId::random(), now);
        assert!(!record.is_expired_at(now));
        assert!(record.is_expired_at(now + Duration::minutes(1)));
        assert!(
            !TokenPolicy::never_expires()
                .issue(&BearerToken::mint(), AccountId::random(), now)
                .is_expired_at(now + Duration::days(3650))
        );
    }
}
