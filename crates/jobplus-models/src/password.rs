//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own random
//! salt and parameters, so the same plaintext hashes differently on every
//! call and verification needs nothing but the stored string. With the
//! default parameters the string is 97 characters, inside the 100-character
//! `user.password` column.
//!
//! No strength rules are applied here.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::ModelError;

/// Hashes a plaintext secret with a fresh random salt.
///
/// # Errors
///
/// Returns `ModelError::PasswordHash` if the hashing operation fails.
pub fn hash_password(plaintext: &str) -> Result<String, ModelError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ModelError::PasswordHash(format!("hashing failed: {e}")))
}

/// Verifies a candidate secret against a stored PHC hash.
///
/// A wrong candidate yields `Ok(false)`.
///
/// # Errors
///
/// Returns `ModelError::PasswordHash` if `stored_hash` is empty or not a
/// valid PHC string, or if verification fails for a reason other than a
/// mismatch.
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, ModelError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ModelError::PasswordHash(format!("invalid stored hash: {e}")))?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ModelError::PasswordHash(format!(
            "verification failed: {e}"
        ))),
    }
}
