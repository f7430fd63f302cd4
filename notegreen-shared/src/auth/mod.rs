/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation

pub mod password;
