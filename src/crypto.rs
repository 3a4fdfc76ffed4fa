//! Argon2 hashing for passwords and one-time codes.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::{OsRng, RngCore};

use crate::error::{AppError, AppResult};

pub fn hash_secret(secret: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(AppError::internal)?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_secret(secret: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|_| AppError::internal("Invalid stored hash"))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

/// Four-digit numeric code in `1000..=9999`.
pub fn generate_otp_code() -> String {
    let n = 1000 + OsRng.next_u32() % 9000;
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let hash = hash_secret("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_secret("correct horse", &hash).unwrap());
        assert!(!verify_secret("wrong horse", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_secret("x", "not-a-phc-string").is_err());
    }

    #[test]
    fn otp_codes_are_four_digits() {
        for _ in 0..200 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 4);
            let n: u32 = code.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }
}
