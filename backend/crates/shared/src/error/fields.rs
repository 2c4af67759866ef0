//! Field Errors - per-field validation messages
//!
//! Collects validation failures keyed by the request field that caused them.
//! Serialized as `{"field": ["message", ...]}` inside the problem body.

use std::collections::BTreeMap;

use serde::Serialize;

use super::app_error::{AppError, AppResult};

/// Message used when a required field is absent from the payload
pub const REQUIRED: &str = "This field is required.";

/// Key for failures that belong to the request as a whole
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Validation messages grouped by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Builder-style variant of [`FieldErrors::add`]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// Take an optional field, recording [`REQUIRED`] when it is missing
    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, REQUIRED);
        }
        value
    }

    /// Keep the value of a successful check, record the message of a failed one
    ///
    /// Messages of nested field errors are recorded under their own field
    /// names.
    pub fn check<T>(&mut self, field: &str, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if !err.field_errors().is_empty() => {
                self.extend(err.field_errors().clone());
                None
            }
            Err(err) => {
                self.add(field, err.message());
                None
            }
        }
    }

    /// Merge messages from another collection
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::bad_request("Validation failed").with_field_errors(errors)
    }
}
