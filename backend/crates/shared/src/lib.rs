//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types, field-level validation errors and result aliases
//! - Typed integer IDs for entities referenced across contexts
//! - Page/limit pagination
//! - The authenticated caller (`identity`) and capability checks (`permission`)
//! - The generic create-or-destroy component for user-owned join records (`relation`)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod fields;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
#[cfg(feature = "axum")]
pub mod identity;
pub mod pagination;
pub mod permission;
pub mod relation;
