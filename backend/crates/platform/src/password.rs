//! Credential Boundary
//!
//! The only place in the workspace that touches plaintext secrets.
//!
//! - Argon2id hashing with a fresh 128-bit salt per call
//! - Self-describing PHC digests (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`)
//! - Constant-time verification using the parameters embedded in the digest
//! - Zeroization of plaintext on drop, redacted `Debug`
//! - Blocking-pool offload for async callers
//!
//! Hashing is deliberately slow. Async code must use [`CredentialHasher::hash_blocking`]
//! and [`CredentialHasher::verify_blocking`] instead of calling the synchronous
//! methods on a runtime worker thread.

use std::fmt;
use std::sync::{Arc, OnceLock};

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on secret length, in characters
pub const MAX_SECRET_LENGTH: usize = 1024;

/// OWASP recommended Argon2id memory cost (19 MiB)
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;

/// OWASP recommended Argon2id iterations
pub const DEFAULT_ITERATIONS: u32 = 2;

/// OWASP recommended Argon2id lanes
pub const DEFAULT_PARALLELISM: u32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Credential boundary errors
///
/// These are caller errors or infrastructure failures. A wrong password is
/// never an error: verification simply returns `false`.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Empty or otherwise unusable secret
    #[error("Invalid credential input: {0}")]
    InvalidInput(&'static str),

    /// Work factor rejected by Argon2
    #[error("Invalid work factor: {0}")]
    InvalidWorkFactor(String),

    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Digest is not a PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Blocking worker was cancelled or panicked
    #[error("Hashing worker unavailable")]
    WorkerUnavailable,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text secret with automatic memory zeroization
///
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone`
/// - Debug output is redacted
///
/// Unicode is NFKC-normalized so that visually identical input hashes identically.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap a secret, rejecting empty or oversized input
    pub fn new(raw: String) -> Result<Self, CredentialError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.is_empty() {
            return Err(CredentialError::InvalidInput("secret is empty"));
        }

        if normalized.chars().count() > MAX_SECRET_LENGTH {
            let mut normalized = normalized;
            normalized.zeroize();
            return Err(CredentialError::InvalidInput("secret is too long"));
        }

        Ok(Self(normalized))
    }

    /// Number of Unicode code points
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Digest in PHC string format
///
/// Embeds algorithm, version, work factor, salt and hash, so it fully
/// determines its own verification. Two digests of the same secret are
/// never equal; compare with [`CredentialHasher::verify`], never with `==`.
#[derive(Clone)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, CredentialError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| CredentialError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    pub fn into_phc_string(self) -> String {
        self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Work factor
// ============================================================================

/// Argon2id cost parameters used for new digests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl WorkFactor {
    /// Very cheap parameters. For tests and local development only.
    pub fn development() -> Self {
        Self {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn params(&self) -> Result<Params, CredentialError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CredentialError::InvalidWorkFactor(e.to_string()))
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// Hashing and verification service
///
/// Cheap to clone; the pepper and work factor are shared.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
    work_factor: WorkFactor,
    pepper: Option<Arc<[u8]>>,
    dummy_digest: Arc<OnceLock<String>>,
}

impl CredentialHasher {
    /// Build a hasher; rejects work factors Argon2 cannot use
    pub fn new(work_factor: WorkFactor, pepper: Option<Vec<u8>>) -> Result<Self, CredentialError> {
        Ok(Self {
            params: work_factor.params()?,
            work_factor,
            pepper: pepper.filter(|p| !p.is_empty()).map(Arc::from),
            dummy_digest: Arc::new(OnceLock::new()),
        })
    }

    pub fn work_factor(&self) -> WorkFactor {
        self.work_factor
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Secret bytes with the pepper appended
    fn peppered(&self, password: &ClearTextPassword) -> zeroize::Zeroizing<Vec<u8>> {
        let mut combined = password.as_bytes().to_vec();
        if let Some(pepper) = &self.pepper {
            combined.extend_from_slice(pepper);
        }
        zeroize::Zeroizing::new(combined)
    }

    /// One-way, randomly salted transformation
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, CredentialError> {
        let salt = SaltString::generate(OsRng);
        let bytes = self.peppered(password);

        let hash = self
            .argon2()
            .hash_password(&bytes, &salt)
            .map_err(|e| CredentialError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Check a secret against a stored digest
    ///
    /// Returns `false` for a wrong secret and for a malformed digest alike.
    /// The two are only distinguished in logs.
    pub fn verify(&self, password: &ClearTextPassword, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password digest is malformed");
                return false;
            }
        };

        let bytes = self.peppered(password);

        // Parameters come from the digest; comparison is constant time
        match self.argon2().verify_password(&bytes, &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Password digest could not be verified");
                false
            }
        }
    }

    /// Burn the same effort as a real verification when there is no digest to check
    ///
    /// Keeps "unknown account" indistinguishable from "wrong password" by timing.
    pub fn verify_dummy(&self, password: &ClearTextPassword) {
        let digest = self.dummy_digest.get_or_init(|| {
            let filler = crate::crypto::to_base64url(&crate::crypto::random_bytes(24));
            ClearTextPassword::new(filler)
                .and_then(|p| self.hash(&p))
                .map(HashedPassword::into_phc_string)
                .unwrap_or_default()
        });
        let _ = self.verify(password, digest);
    }

    /// Whether a digest was produced with a different algorithm or work factor
    pub fn needs_rehash(&self, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return true;
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(params) => {
                params.m_cost() != self.work_factor.memory_kib
                    || params.t_cost() != self.work_factor.iterations
                    || params.p_cost() != self.work_factor.parallelism
            }
            Err(_) => true,
        }
    }

    /// [`Self::hash`] on the blocking pool
    pub async fn hash_blocking(
        &self,
        password: ClearTextPassword,
    ) -> Result<HashedPassword, CredentialError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                CredentialError::WorkerUnavailable
            })?
    }

    /// [`Self::verify`] on the blocking pool; a failed worker counts as a mismatch
    pub async fn verify_blocking(&self, password: ClearTextPassword, digest: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&password, &digest)).await {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }

    /// [`Self::verify_dummy`] on the blocking pool
    pub async fn verify_dummy_blocking(&self, password: ClearTextPassword) {
        let hasher = self.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await {
            tracing::error!(error = %e, "Dummy verification task failed");
        }
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("work_factor", &self.work_factor)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// String-level entry points
// ============================================================================

/// Hash a plaintext secret with the default work factor and no pepper
pub fn hash(secret: &str) -> Result<String, CredentialError> {
    let password = ClearTextPassword::new(secret.to_string())?;
    let hasher = CredentialHasher::new(WorkFactor::default(), None)?;
    hasher.hash(&password).map(HashedPassword::into_phc_string)
}

/// Verify a plaintext secret against a digest produced by [`hash`]
pub fn verify(secret: &str, digest: &str) -> bool {
    let Ok(password) = ClearTextPassword::new(secret.to_string()) else {
        return false;
    };
    match CredentialHasher::new(WorkFactor::default(), None) {
        Ok(hasher) => hasher.verify(&password, digest),
        Err(_) => false,
    }
}

// ============================================================================
// Tests
// ============================================================================
