//! Password hashing - the single hashing entry point for the application.
//!
//! Argon2id with a random salt per call, PHC string output.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::Config;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One-way salted password hashing with matching verification.
///
/// Two calls on the same input normally yield different hashes; only
/// `verify` against the original plaintext is guaranteed to succeed.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password.
    fn hash(&self, plain_text: &str) -> AppResult<String>;

    /// Check a plaintext password against a stored hash.
    /// Malformed hashes never verify.
    fn verify(&self, plain_text: &str, hash: &str) -> bool;
}

/// Argon2id hasher with configurable cost.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with explicit cost parameters.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if argon2 rejects the parameters.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::internal(format!("Invalid password hash parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// Create a hasher from application configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }

    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        // Cheap parameters keep the test suite fast
        Argon2Hasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("SecurePassword123!").unwrap();

        assert_ne!(hash, "SecurePassword123!");
        assert!(hasher.verify("SecurePassword123!", &hash));
        assert!(!hasher.verify("WrongPassword123", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = hasher();
        let first = hasher.hash("SamePassword123").unwrap();
        let second = hasher.hash("SamePassword123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("SamePassword123", &first));
        assert!(hasher.verify("SamePassword123", &second));
    }

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let hash = hasher().hash("secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_uses_params_embedded_in_hash() {
        let hash = hasher().hash("secret").unwrap();
        assert!(Argon2Hasher::default().verify("secret", &hash));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!hasher().verify("secret", "not-a-phc-string"));
        assert!(!hasher().verify("secret", ""));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Argon2Hasher::new(1024, 0, 1);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
