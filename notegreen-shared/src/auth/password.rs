/// Password hashing with Argon2id
///
/// Hashes are stored as PHC strings, so the parameters travel with each hash
/// and verification keeps working if the defaults below are raised later.
///
/// Parameters: 19 MiB memory, 2 passes, 1 lane.
///
/// # Example
///
/// ```
/// use notegreen_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse battery staple")?;
/// assert!(verify_password("correct horse battery staple", &hash)?);
/// assert!(!verify_password("Tr0ub4dor&3", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::OnceLock;

/// Memory cost in KiB
const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Longest accepted password; bounds hashing work per request
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash
///
/// # Returns
///
/// `Ok(true)` on match, `Ok(false)` on mismatch
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Hash of a throwaway password, built on first use
fn dummy_hash() -> Result<&'static str, PasswordError> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }

    let hash = hash_password("notegreen-unknown-account")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

/// Runs a full verification against a throwaway hash
///
/// Used when the account doesn't exist, so a failed login takes as long for
/// an unknown username as for a wrong password.
///
/// # Errors
///
/// Returns an error if the throwaway hash cannot be built
pub fn verify_dummy(password: &str) -> Result<(), PasswordError> {
    verify_password(password, dummy_hash()?).map(|_| ())
}

/// Checks length bounds and rejects all-whitespace passwords
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at most {} characters long",
            MAX_PASSWORD_LENGTH
        ));
    }

    if password.trim().is_empty() {
        return Err("Password must not be blank".to_string());
    }

    Ok(())
}
