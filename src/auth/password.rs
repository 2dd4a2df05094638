use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::config::Config;
use crate::error::AppError;

/// Argon2id hasher with a configurable work factor.
///
/// Hashes are PHC strings carrying their own salt and parameters, so
/// `verify` keeps working for hashes produced under older settings.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::Internal(format!("invalid argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub fn verify(&self, password: &str, hashed: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hashed)
            .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::Internal(format!("password verification failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = fast_hasher();
        let hashed = hasher.hash("pw1").unwrap();

        assert!(hashed.starts_with("$argon2id$"));
        assert!(hasher.verify("pw1", &hashed).unwrap());
        assert!(!hasher.verify("pw2", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = fast_hasher();
        let a = hasher.hash("secret").unwrap();
        let b = hasher.hash("secret").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify("secret", &a).unwrap());
        assert!(hasher.verify("secret", &b).unwrap());
    }

    #[test]
    fn hashes_from_other_parameters_still_verify() {
        let old = PasswordHasher::new(2048, 2, 1).unwrap();
        let hashed = old.hash("carry-over").unwrap();

        assert!(fast_hasher().verify("carry-over", &hashed).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        let err = fast_hasher().verify("pw", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(PasswordHasher::new(1024, 0, 1).is_err());
    }
}
