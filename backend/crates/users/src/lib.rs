//! Users Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, read models, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Features
//! - Registration, profiles and account deletion
//! - Token login/logout backed by server-side sessions
//! - Password change with policy checks
//! - Subscriptions to other authors
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Session tokens signed with HMAC-SHA256
//! - Sessions bound to client fingerprint (User-Agent)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::UsersConfig;
pub use error::{UserError, UserResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::middleware::{SessionState, authenticate};
pub use presentation::router::{users_router, users_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
