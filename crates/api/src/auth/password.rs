//! Argon2id password hashing, verification, and strength validation.
//!
//! Hashes use Argon2id with explicit cost parameters (about 50 ms or more
//! per hash on server hardware) and a random salt from [`OsRng`]. The PHC
//! string format embeds the parameters and salt in the hash itself.
//!
//! The `*_blocking` helpers move the work off the async executor.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{AppError, AppResult};

/// Memory cost in KiB.
const M_COST: u32 = 32 * 1024;
const T_COST: u32 = 3;
const P_COST: u32 = 1;

fn hasher() -> Argon2<'static> {
    // The constants above are within argon2's accepted ranges.
    let params = Params::new(M_COST, T_COST, P_COST, None).unwrap_or_default();
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// The parameters embedded in the hash are used, so hashes made with older
/// costs keep verifying.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match hasher().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// A valid hash of a random secret, verified against when no real hash
/// exists so unknown accounts cost the same as wrong passwords.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        let secret = uuid::Uuid::new_v4().to_string();
        hash_password(&secret).unwrap_or_default()
    })
}

/// Validate that a password meets minimum strength requirements.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::InternalError(format!("Hashing task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// [`verify_password`] on the blocking thread pool.
///
/// With `hash = None` the candidate is checked against a dummy hash and the
/// result is always `false`.
pub async fn verify_password_blocking(password: String, hash: Option<String>) -> AppResult<bool> {
    let has_real_hash = hash.is_some();
    let verified = tokio::task::spawn_blocking(move || {
        let hash = hash.unwrap_or_else(|| dummy_hash().to_string());
        verify_password(&password, &hash)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Verification task failed: {e}")))?;

    match verified {
        Ok(ok) => Ok(ok && has_real_hash),
        Err(e) if has_real_hash => Err(AppError::InternalError(format!(
            "Password verification error: {e}"
        ))),
        Err(_) => Ok(false),
    }
}
