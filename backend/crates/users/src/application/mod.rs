//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod profile;
pub mod register;
pub mod set_password;
pub mod sign_in;
pub mod sign_out;
pub mod subscriptions;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::UsersConfig;
pub use profile::{ListLocation, ProfileUseCase, UpdateProfileInput};
pub use register::{RegisterInput, RegisterUseCase};
pub use set_password::{SetPasswordInput, SetPasswordUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use subscriptions::ListSubscriptionsUseCase;
