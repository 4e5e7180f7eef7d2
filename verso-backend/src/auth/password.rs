//! Password hashing helpers
//!
//! Credentials are stored only as salted bcrypt hashes. Verification goes
//! through bcrypt's own comparison rather than string equality.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password for storage
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a claimed password against a stored hash.
/// Any bcrypt error counts as a failed verification.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_roundtrip() {
        let hashed = hash_password("hunter2").expect("Failed to hash");
        assert_ne!(hashed, "hunter2");
        assert!(verify_password("hunter2", &hashed));
        assert!(!verify_password("hunter3", &hashed));
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
