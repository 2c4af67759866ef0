//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::{UsersAppState, UsersBackend};
pub use middleware::{ClientInfo, SessionState, authenticate};
pub use router::{users_router, users_router_generic};
