//! API DTOs (Data Transfer Objects)
//!
//! Request fields are optional so that missing ones are reported as field
//! errors instead of a body rejection.

use kernel::id::UserId;
use kernel::pagination::PageQuery;
use serde::{Deserialize, Serialize};

use crate::application::{RegisterInput, SetPasswordInput, SignInInput, UpdateProfileInput};
use crate::domain::entity::user::User;

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            password: req.password,
        }
    }
}

/// Created account, without the viewer-dependent `is_subscribed`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub email: String,
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email.to_string(),
            id: user.id,
            username: user.username.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UpdateUserRequest> for UpdateProfileInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl From<SetPasswordRequest> for SetPasswordInput {
    fn from(req: SetPasswordRequest) -> Self {
        Self {
            current_password: req.current_password,
            new_password: req.new_password,
        }
    }
}

/// `GET /subscriptions` query string
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u32>,
}

impl SubscriptionsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

// ============================================================================
// Token login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<LoginRequest> for SignInInput {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}
