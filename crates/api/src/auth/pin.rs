//! Argon2id PIN hashing, verification, and format validation.
//!
//! Field workers authenticate with a short numeric PIN instead of a
//! password. PINs are stored as Argon2id hashes with a cryptographically
//! random salt generated via [`OsRng`]; the PHC string format is used for
//! storage so that algorithm parameters and salt are embedded in the hash
//! itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum PIN length in digits.
pub const PIN_MIN_LEN: usize = 4;

/// Maximum PIN length in digits.
pub const PIN_MAX_LEN: usize = 6;

/// Hash a plaintext PIN using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_pin(pin: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(pin.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext PIN against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the PIN matches, `Ok(false)` if it does not.
pub fn verify_pin(pin: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(pin.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate that a PIN is 4 to 6 ASCII digits.
///
/// Returns `Ok(())` when the PIN is acceptable, or `Err` with a
/// human-readable explanation.
pub fn validate_pin_format(pin: &str) -> Result<(), String> {
    if pin.len() < PIN_MIN_LEN || pin.len() > PIN_MAX_LEN {
        return Err(format!(
            "PIN must be {PIN_MIN_LEN} to {PIN_MAX_LEN} digits long"
        ));
    }
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err("PIN must contain only digits".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let pin = "4711";
        let hash = hash_pin(pin).expect("hashing should succeed");

        // The hash must be a valid PHC string starting with the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = verify_pin(pin, &hash).expect("verify should succeed");
        assert!(verified, "correct PIN should verify as true");
    }

    #[test]
    fn test_wrong_pin_fails() {
        let hash = hash_pin("1234").expect("hashing should succeed");
        let verified = verify_pin("4321", &hash).expect("verify should succeed");
        assert!(!verified, "wrong PIN should verify as false");
    }

    #[test]
    fn test_pin_format_bounds() {
        assert!(validate_pin_format("123").is_err(), "too short");
        assert!(validate_pin_format("1234567").is_err(), "too long");
        assert!(validate_pin_format("1234").is_ok());
        assert!(validate_pin_format("123456").is_ok());
    }

    #[test]
    fn test_pin_format_rejects_non_digits() {
        let err = validate_pin_format("12a4").unwrap_err();
        assert!(err.contains("only digits"));
    }
}
