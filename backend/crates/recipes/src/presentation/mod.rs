//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{RecipesAppState, RecipesBackend};
pub use router::{recipes_router, recipes_router_generic};
