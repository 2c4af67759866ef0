//! Password Policy, Hashing and Verification
//!
//! - Policy checks for newly chosen passwords (length, character set,
//!   common and numeric-only passwords, similarity to account attributes)
//! - Argon2id hashing in PHC string format with optional pepper
//! - Zeroization of clear-text passwords on drop

use std::fmt;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Attribute fragments shorter than this are not checked for similarity
const MIN_ATTRIBUTE_FRAGMENT: usize = 3;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("This password is too short. It must contain at least {min} characters.")]
    TooShort { min: usize, actual: usize },

    #[error("This password is too long. It must contain at most {max} characters.")]
    TooLong { max: usize, actual: usize },

    #[error("This password cannot be blank.")]
    EmptyOrWhitespace,

    #[error("This password contains invalid control characters.")]
    InvalidCharacter,

    #[error("This password is too common.")]
    CommonPattern,

    #[error("This password is entirely numeric.")]
    EntirelyNumeric,

    #[error("The password is too similar to the {attribute}.")]
    TooSimilar { attribute: String },
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear text password
// ============================================================================

/// Clear-text password, NFKC-normalized and zeroized on drop
///
/// Not `Clone`; `Debug` output is redacted.
///
/// ```rust
/// use platform::password::Password;
///
/// let chosen = Password::new("correct horse battery".to_string()).unwrap();
/// let attempt = Password::unchecked("anything goes".to_string());
/// # let _ = (chosen, attempt);
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    /// Accept a newly chosen password if it satisfies the policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::unchecked(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Wrap a password that is only going to be verified, never stored
    pub fn unchecked(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        let password = self.0.as_str();

        if password.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count code points, not bytes
        let char_count = password.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if password
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if password.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(PasswordPolicyError::EntirelyNumeric);
        }

        if is_common_pattern(password) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(())
    }

    /// Reject passwords that contain one of the account's own attributes
    ///
    /// `attributes` pairs a label (`"username"`, `"email address"`) with its
    /// value. Email values are also checked by their local part.
    pub fn check_similarity(&self, attributes: &[(&str, &str)]) -> Result<(), PasswordPolicyError> {
        let lower = self.0.to_lowercase();

        for (label, value) in attributes {
            let value = value.to_lowercase();
            let local_part = value.split('@').next().unwrap_or_default().to_string();

            let similar = [value, local_part]
                .iter()
                .filter(|fragment| fragment.chars().count() >= MIN_ATTRIBUTE_FRAGMENT)
                .any(|fragment| lower.contains(fragment.as_str()) || fragment.contains(&lower));

            if similar {
                return Err(PasswordPolicyError::TooSimilar {
                    attribute: (*label).to_string(),
                });
            }
        }

        Ok(())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Hash with Argon2id (default OWASP parameters: m=19 MiB, t=2, p=1)
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            phc: hash.to_string(),
        })
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Hashed password
// ============================================================================

/// Argon2id hash in PHC string format, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    phc: String,
}

impl HashedPassword {
    /// Load a PHC string from storage
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = s.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// Constant-time verification; `pepper` must match the one used to hash
    pub fn verify(&self, password: &Password, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };

        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("phc", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];
    if KEYBOARD_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein1",
        "welcome1",
        "admin123",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "baseball",
        "trustno1",
        "foodgram",
    ];
    COMMON_PASSWORDS.contains(&lower.as_str())
}

fn is_sequential_numbers(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let ascending = digits
        .windows(2)
        .all(|w| w[1] == (w[0] + 1) % 10);
    let descending = digits
        .windows(2)
        .all(|w| w[0] == (w[1] + 1) % 10);

    ascending || descending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = Password::new("short".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let result = Password::new("ab".repeat(MAX_PASSWORD_LENGTH));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_blank() {
        assert!(matches!(
            Password::new("          ".to_string()),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_entirely_numeric() {
        let result = Password::new("80417362".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::EntirelyNumeric)));
    }

    #[test]
    fn test_password_common() {
        for raw in ["password123", "qwertyuiop", "aaaaaaaaaa", "Foodgram"] {
            let result = Password::new(raw.to_string());
            assert!(
                matches!(result, Err(PasswordPolicyError::CommonPattern)),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_valid_password() {
        assert!(Password::new("MySecure#Pass2024!".to_string()).is_ok());
        assert!(Password::new("パスワード安全です!".to_string()).is_ok());
    }

    #[test]
    fn test_similarity_to_account() {
        let password = Password::new("chefmaria-cooks".to_string()).unwrap();
        let err = password
            .check_similarity(&[("username", "chefmaria"), ("email address", "x@y.io")])
            .unwrap_err();
        assert_eq!(
            err,
            PasswordPolicyError::TooSimilar {
                attribute: "username".to_string()
            }
        );

        let err = password
            .check_similarity(&[("email address", "chefmaria@example.com")])
            .unwrap_err();
        assert!(matches!(err, PasswordPolicyError::TooSimilar { .. }));

        assert!(
            password
                .check_similarity(&[("username", "bob"), ("first name", "Al")])
                .is_ok()
        );
    }

    #[test]
    fn test_hash_and_verify() {
        let password = Password::unchecked("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        assert!(hashed.verify(&password, None));
        assert!(!hashed.verify(&Password::unchecked("WrongPassword123!".to_string()), None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = Password::unchecked("TestPassword123!".to_string());
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_nfkc_normalization_on_verify() {
        // U+FF21 FULLWIDTH LATIN CAPITAL LETTER A normalizes to "A"
        let hashed = Password::unchecked("Abcdefgh9!".to_string()).hash(None).unwrap();
        assert!(hashed.verify(&Password::unchecked("\u{FF21}bcdefgh9!".to_string()), None));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = Password::unchecked("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password, None));
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = Password::unchecked("secret-value".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
