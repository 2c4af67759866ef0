//! Infrastructure Layer
//!
//! Database implementations of the repository traits.

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRecipeRepository;
