//! Domain Layer
//!
//! Contains entities, value objects, read models and repository traits.

pub mod entity;
pub mod repository;
pub mod subscription;
pub mod value_object;
pub mod view;

// Re-exports
pub use entity::{credentials::Credentials, session::Session, user::User};
pub use repository::{CredentialRepository, ProfileQuery, SessionRepository, UserRepository};
pub use subscription::Subscription;
