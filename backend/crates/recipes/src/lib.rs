//! Recipes Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, read models, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Read-only tag and ingredient catalog with name-prefix search
//! - Recipe publishing with tags, ingredient amounts and a base64 picture
//! - Filtered, paginated recipe feed
//! - Favorites and a shopping cart with a plain-text shopping list export
//!
//! Callers are identified by the [`kernel::identity::CurrentUser`] extension
//! that the session middleware of the `users` crate inserts.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::RecipesConfig;
pub use error::{RecipeError, RecipeResult};
pub use infra::postgres::PgRecipeRepository;
pub use presentation::router::{recipes_router, recipes_router_generic};
