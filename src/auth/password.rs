//! Argon2 password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::ApiError;

/// Hash a plain-text password into a PHC-format string.
///
/// # Errors
///
/// Returns a 500-class `ApiError` when hashing fails.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal("Failed to hash password", Some(e.to_string())))
}

/// Verify a plain-text password against a stored hash. A wrong password is
/// `Ok(false)`; only a malformed stored hash or an internal failure errors.
///
/// # Errors
///
/// Returns a 500-class `ApiError` when the stored hash cannot be parsed or
/// verification fails for a reason other than a mismatch.
pub fn verify_password(stored_hash: &str, provided: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        ApiError::internal("Stored password hash is invalid", Some(e.to_string()))
    })?;
    match Argon2::default().verify_password(provided.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::internal(
            "Password verification failed",
            Some(e.to_string()),
        )),
    }
}
