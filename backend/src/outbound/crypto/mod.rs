//! Argon2id implementation of the `SecretHasher` port.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=…,t=…,p=…$salt$hash`), so the
//! cost parameters travel with each hash and older hashes still verify after
//! the configured cost changes. All hashing runs on the blocking pool.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::SecretHash;
use crate::domain::ports::{SecretHasher, SecretHasherError};

const SALT_BYTES: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
    /// Memory in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl HashingCost {
    /// Minimal cost for tests. Never use in production.
    pub const fn testing() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

impl Default for HashingCost {
    /// 19 MiB, two passes, one lane.
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

fn hash_error(err: impl std::fmt::Display) -> SecretHasherError {
    SecretHasherError::hash(err.to_string())
}

fn hash_with(argon2: &Argon2<'_>, secret: &[u8]) -> Result<String, SecretHasherError> {
    let mut salt_bytes = [0_u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(hash_error)?;
    argon2
        .hash_password(secret, &salt)
        .map(|hash| hash.to_string())
        .map_err(hash_error)
}

fn verify_with(argon2: &Argon2<'_>, secret: &[u8], encoded: &str) -> Result<bool, SecretHasherError> {
    let parsed = PasswordHash::new(encoded).map_err(hash_error)?;
    match argon2.verify_password(secret, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(hash_error(err)),
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, SecretHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SecretHasherError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| SecretHasherError::hash(format!("hashing task failed: {err}")))?
}

/// Argon2id secret hasher with a pre-computed decoy hash.
#[derive(Clone)]
pub struct Argon2SecretHasher {
    argon2: Argon2<'static>,
    decoy: String,
}

impl Argon2SecretHasher {
    /// Build a hasher with the given cost.
    ///
    /// # Errors
    ///
    /// Fails when the parameters are rejected by Argon2 or the decoy hash
    /// cannot be computed.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::outbound::crypto::{Argon2SecretHasher, HashingCost};
    ///
    /// let hasher = Argon2SecretHasher::new(HashingCost::testing()).expect("valid cost");
    /// # let _ = hasher;
    /// ```
    pub fn new(cost: HashingCost) -> Result<Self, SecretHasherError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(hash_error)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let mut decoy_secret = Zeroizing::new([0_u8; 32]);
        OsRng.fill_bytes(&mut decoy_secret[..]);
        let decoy = hash_with(&argon2, &decoy_secret[..])?;
        Ok(Self { argon2, decoy })
    }
}

#[async_trait]
impl SecretHasher for Argon2SecretHasher {
    async fn hash(&self, secret: &str) -> Result<SecretHash, SecretHasherError> {
        let argon2 = self.argon2.clone();
        let secret = Zeroizing::new(secret.to_owned());
        run_blocking(move || hash_with(&argon2, secret.as_bytes()))
            .await
            .map(SecretHash::new)
    }

    async fn verify(&self, secret: &str, hash: &SecretHash) -> Result<bool, SecretHasherError> {
        let argon2 = self.argon2.clone();
        let secret = Zeroizing::new(secret.to_owned());
        let encoded = hash.as_str().to_owned();
        run_blocking(move || verify_with(&argon2, secret.as_bytes(), &encoded)).await
    }

    async fn verify_decoy(&self, secret: &str) {
        let argon2 = self.argon2.clone();
        let secret = Zeroizing::new(secret.to_owned());
        let decoy = self.decoy.clone();
        if let Err(err) =
            run_blocking(move || verify_with(&argon2, secret.as_bytes(), &decoy)).await
        {
            warn!(%err, "decoy verification failed");
        }
    }
}
