//! Password hashing behind the [`PasswordService`] port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use blogicum_core::ports::{AuthError, PasswordService};

/// Argon2id hasher with the library defaults. Hashes carry their own salt
/// and parameters, so defaults can change without invalidating stored
/// credentials.
#[derive(Default)]
pub struct Argon2PasswordService {
    hasher: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(stored).map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(self
            .hasher
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_accepts_only_the_original_password() {
        let service = Argon2PasswordService::new();
        let hash = service.hash("correct horse battery").unwrap();

        assert!(service.verify("correct horse battery", &hash).unwrap());
        assert!(!service.verify("correct horse salvage", &hash).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        let service = Argon2PasswordService::new();
        assert!(matches!(
            service.verify("anything", "not-a-phc-string"),
            Err(AuthError::HashingError(_))
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = Argon2PasswordService::new();
        let a = service.hash("same password").unwrap();
        let b = service.hash("same password").unwrap();
        assert_ne!(a, b);
    }
}
