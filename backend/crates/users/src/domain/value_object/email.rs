//! Email Value Object
//!
//! Validated, lower-cased email address. Unique across accounts and used as
//! the login identifier.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

/// Maximum email length
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl AsRef<str>) -> AppResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("This field may not be blank."));
        }

        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Ensure this field has no more than {EMAIL_MAX_LENGTH} characters."
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Enter a valid email address."));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }
        if local.chars().any(char::is_whitespace) {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }
        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) || domain.contains(".."))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the `@`
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("cook@example.com").is_ok());
        assert!(Email::new("cook.name@example.co.uk").is_ok());
        assert!(Email::new("cook+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("cookexample.com").is_err());
        assert!(Email::new("cook@").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("cook@@example.com").is_err());
        assert!(Email::new("cook@example").is_err());
        assert!(Email::new("cook@example..com").is_err());
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new("  Cook@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "cook@example.com");
        assert_eq!(email.local_part(), "cook");
        assert_eq!(email.to_string(), "cook@example.com");
    }
}
