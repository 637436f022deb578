//! Password value object.
//!
//! Encapsulates one-way salted hashing and constant-time verification.
//! The plaintext never leaves this module once hashed, and the hash is
//! redacted from debug output.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::{ARGON2_M_COST, ARGON2_P_COST, ARGON2_T_COST, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// A hashed password. Immutable once created.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// The salt is embedded in the resulting PHC string, so the same
    /// input produces a different hash on every call.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than the
    /// configured minimum.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::hasher()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a stored hash loaded from the credential store.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// The PHC hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plaintext password against this hash.
    ///
    /// Constant-time with respect to the candidate password; a mismatch
    /// is `false`, never an error.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        Self::hasher()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }

    /// Argon2id instance with the configured work factor.
    fn hasher() -> Argon2<'static> {
        let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
            .expect("argon2 parameters are compile-time constants");
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}
