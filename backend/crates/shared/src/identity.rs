//! Request identity
//!
//! The session middleware stores a [`CurrentUser`] in the request extensions
//! when the caller presented a valid token. Handlers pick it up through the
//! extractors below without knowing how the token was checked.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::app_error::AppError;
use crate::id::UserId;

/// Signed-in caller; extraction fails with 401 for anonymous requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

/// Caller if signed in; never rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeUser(pub Option<UserId>);

impl MaybeUser {
    pub fn id(&self) -> Option<UserId> {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().copied().ok_or_else(|| {
            AppError::unauthorized("Authentication credentials were not provided.")
                .with_action("Sign in and retry")
        })
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts.extensions.get::<CurrentUser>().map(|user| user.0),
        ))
    }
}
