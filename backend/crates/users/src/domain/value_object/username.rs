//! Username Value Object
//!
//! Public handle shown next to recipes. Letters, digits and `@ . + - _`
//! only, at most 150 characters after NFKC normalization. Case is kept as
//! entered.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a username (in characters)
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Names that would shadow routes under `/users/`
const RESERVED: &[&str] = &["me", "set_password", "subscriptions"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().trim().nfkc().collect();

        if normalized.is_empty() {
            return Err(AppError::bad_request("This field may not be blank."));
        }

        if normalized.chars().count() > USERNAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Ensure this field has no more than {USERNAME_MAX_LENGTH} characters."
            )));
        }

        if !normalized
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(AppError::bad_request(
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            ));
        }

        if RESERVED.contains(&normalized.to_lowercase().as_str()) {
            return Err(AppError::bad_request("This username is reserved."));
        }

        Ok(Self(normalized))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_allowed_characters() {
        assert!(Username::new("chef.maria+test@home_1-2").is_ok());
        assert!(Username::new("шеф").is_ok());
        assert!(Username::new("bad name").is_err());
        assert!(Username::new("semi;colon").is_err());
    }

    #[test]
    fn test_username_length() {
        assert!(Username::new("a".repeat(USERNAME_MAX_LENGTH)).is_ok());
        assert!(Username::new("a".repeat(USERNAME_MAX_LENGTH + 1)).is_err());
        assert!(Username::new("   ").is_err());
    }

    #[test]
    fn test_username_nfkc_and_reserved() {
        // Fullwidth letters normalize to ASCII
        let name = Username::new("\u{FF41}\u{FF42}c").unwrap();
        assert_eq!(name.as_str(), "abc");

        assert!(Username::new("Me").is_err());
        assert!(Username::new("set_password").is_err());
    }
}
