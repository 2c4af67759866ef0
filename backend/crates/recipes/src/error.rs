//! Recipes Error Types
//!
//! Recipe-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, fields::FieldErrors, kind::ErrorKind};
use thiserror::Error;

/// Recipes result type alias
pub type RecipeResult<T> = Result<T, RecipeError>;

/// Recipes error variants
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Recipe not found")]
    RecipeNotFound,

    #[error("Tag not found")]
    TagNotFound,

    #[error("Ingredient not found")]
    IngredientNotFound,

    /// Field-level validation failure
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Full replacement of a recipe is not offered, use PATCH
    #[error("Method \"PUT\" not allowed")]
    MethodNotAllowed,

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

impl RecipeError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecipeError::RecipeNotFound
            | RecipeError::TagNotFound
            | RecipeError::IngredientNotFound => ErrorKind::NotFound,
            RecipeError::Validation(_) => ErrorKind::BadRequest,
            RecipeError::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            RecipeError::Database(e) => classify_sqlx(e).0,
            RecipeError::App(e) => e.kind(),
            RecipeError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            RecipeError::Validation(fields) => fields.into(),
            RecipeError::Database(e) => AppError::from(e),
            RecipeError::App(e) => e,
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            RecipeError::Database(e) => {
                tracing::error!(error = %e, "Recipes database error");
            }
            RecipeError::Internal(msg) => {
                tracing::error!(message = %msg, "Recipes internal error");
            }
            RecipeError::App(e) if e.kind() == ErrorKind::Forbidden => {
                tracing::warn!("Recipe change by non-author rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Recipes error");
            }
        }
    }
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<RecipeError> for AppError {
    fn from(err: RecipeError) -> Self {
        err.log();
        err.into_app_error()
    }
}

impl From<FieldErrors> for RecipeError {
    fn from(fields: FieldErrors) -> Self {
        RecipeError::Validation(fields)
    }
}
