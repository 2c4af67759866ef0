//! Users Error Types
//!
//! User-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::fields::{FieldErrors, NON_FIELD_ERRORS};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Users result type alias
pub type UserResult<T> = Result<T, UserError>;

/// Users error variants
#[derive(Debug, Error)]
pub enum UserError {
    /// User not found
    #[error("User not found")]
    NotFound,

    /// Field-level validation failure
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// `current_password` did not match the stored credential
    #[error("Wrong password")]
    WrongPassword,

    /// Login with unknown email or wrong password
    #[error("Unable to log in with provided credentials")]
    InvalidCredentials,

    /// Caller may not touch another user's account
    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Full replacement of a user is never allowed
    #[error("Full update of a user is not allowed, use PATCH")]
    FullUpdateNotAllowed,

    /// Session not found, expired or badly signed
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Session token presented by a different client
    #[error("Session fingerprint mismatch")]
    SessionFingerprintMismatch,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Error raised by a shared component
    #[error(transparent)]
    App(#[from] AppError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UserError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::NotFound => ErrorKind::NotFound,
            UserError::Validation(_)
            | UserError::WrongPassword
            | UserError::InvalidCredentials => ErrorKind::BadRequest,
            UserError::Forbidden | UserError::FullUpdateNotAllowed => ErrorKind::Forbidden,
            UserError::SessionInvalid
            | UserError::SessionFingerprintMismatch => ErrorKind::Unauthorized,
            UserError::Database(e) => classify_sqlx(e).0,
            UserError::App(e) => e.kind(),
            UserError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            UserError::Validation(fields) => fields.into(),
            UserError::WrongPassword => {
                AppError::validation("current_password", "Wrong password.")
            }
            UserError::InvalidCredentials => AppError::validation(
                NON_FIELD_ERRORS,
                "Unable to log in with provided credentials.",
            ),
            UserError::Database(e) => AppError::from(e),
            UserError::App(e) => e,
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            UserError::Database(e) => {
                tracing::error!(error = %e, "Users database error");
            }
            UserError::Internal(msg) => {
                tracing::error!(message = %msg, "Users internal error");
            }
            UserError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            UserError::SessionFingerprintMismatch => {
                tracing::warn!("Session fingerprint mismatch detected");
            }
            _ => {
                tracing::debug!(error = %self, "Users error");
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        err.log();
        err.into_app_error()
    }
}

impl From<FieldErrors> for UserError {
    fn from(fields: FieldErrors) -> Self {
        UserError::Validation(fields)
    }
}

impl From<platform::password::PasswordHashError> for UserError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        UserError::Internal(err.to_string())
    }
}
