use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::auth::AuthError;

/// Hash for a password nobody knows. Verified against when the username does
/// not exist so both failure paths cost one argon2 run.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("cardatabase-no-such-user").ok());

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Burn one verification against the dummy hash. Always fails.
pub fn verify_against_dummy(password: &str) -> AuthError {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    AuthError::InvalidCredentials
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("user").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "user");
        verify_password("user", &hash).unwrap();
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("admin").unwrap();
        assert!(matches!(
            verify_password("Admin", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("user").unwrap(), hash_password("user").unwrap());
    }

    #[test]
    fn unparseable_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("user", "plaintext-in-db"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn dummy_never_verifies() {
        assert!(matches!(
            verify_against_dummy("cardatabase-no-such-user-guess"),
            AuthError::InvalidCredentials
        ));
    }
}
