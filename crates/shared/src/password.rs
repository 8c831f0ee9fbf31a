//! Applicant password hashing and temporary-password generation.
//!
//! Passwords are stored as Argon2id PHC strings. Temporary passwords are
//! minted by the lockout and reset flows and are always alphanumeric so
//! they can be pasted from any mail client without encoding surprises.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Argon2id parameters following the OWASP recommendation: 19 MiB memory,
/// 2 iterations, parallelism 1, 256-bit output.
const MEMORY_COST: u32 = 19456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// Length of system-issued temporary passwords.
pub const TEMP_PASSWORD_LENGTH: usize = 12;

fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::HashError(format!("Invalid Argon2 params: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with Argon2id and a fresh random salt.
///
/// Returns a self-describing PHC string (algorithm, parameters, salt, hash)
/// so the stored value survives future parameter upgrades.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = create_argon2()?;

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash.
///
/// Returns `Ok(false)` on a clean mismatch; errors only on a malformed
/// hash or an internal failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    // Parameters come from the stored hash itself.
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Generates an alphanumeric temporary password of the given length.
///
/// Random bytes are base64-encoded and every non-alphanumeric character is
/// stripped; more bytes are drawn until enough characters are available,
/// then the result is truncated to `length`.
pub fn generate_temp_password(length: usize) -> String {
    let mut rng = rand::rngs::OsRng;
    let mut out = String::with_capacity(length);

    while out.len() < length {
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        out.extend(
            STANDARD
                .encode(buf)
                .chars()
                .filter(|c| c.is_ascii_alphanumeric()),
        );
    }

    out.truncate(length);
    out
}
