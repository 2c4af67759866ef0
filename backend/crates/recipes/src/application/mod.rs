//! Application Layer
//!
//! Use cases and application services.

pub mod catalog;
pub mod config;
pub mod recipes;
pub mod shopping_list;

// Re-exports
pub use catalog::CatalogUseCase;
pub use config::RecipesConfig;
pub use recipes::{IngredientInput, ListLocation, RecipeInput, RecipeUseCase};
pub use shopping_list::ShoppingListUseCase;
