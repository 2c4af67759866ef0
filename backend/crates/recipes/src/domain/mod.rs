//! Domain Layer
//!
//! Entities, value objects, read models, services and repository traits.

pub mod entities;
pub mod filter;
pub mod relations;
pub mod repository;
pub mod services;
pub mod value_objects;
pub mod view;

// Re-exports
pub use entities::{Ingredient, Recipe, RecipeChanges, RecipeDraft, Tag};
pub use filter::RecipeFilter;
pub use relations::{Favorite, ShoppingCart};
pub use repository::{CatalogRepository, RecipeQuery, RecipeRepository, ShoppingListQuery};
pub use services::{ShoppingItem, ShoppingList};
pub use view::{RecipeRecord, RecipeView, ShortRecipe};
