//! First and last names

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

pub const PERSON_NAME_MAX_LENGTH: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(AppError::bad_request("This field may not be blank."));
        }
        if name.chars().count() > PERSON_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Ensure this field has no more than {PERSON_NAME_MAX_LENGTH} characters."
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Control characters are not allowed."));
        }

        Ok(Self(name.to_string()))
    }

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
    fn test_person_name() {
        assert_eq!(PersonName::new("  Maria ").unwrap().as_str(), "Maria");
        assert!(PersonName::new("").is_err());
        assert!(PersonName::new("x".repeat(151)).is_err());
        assert!(PersonName::new("tab\there").is_err());
    }
}
