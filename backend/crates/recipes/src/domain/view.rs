//! Read models
//!
//! Response shapes of the recipe endpoints. Viewer-dependent flags are
//! computed by the queries that build them.

use kernel::id::{IngredientId, RecipeId, TagId, UserId};
use serde::Serialize;

use super::entities::{Recipe, Tag};
use super::value_objects::IngredientAmount;

/// Recipe author as seen by the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    pub email: String,
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// Ingredient of a recipe with its amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientLine {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Read representation used by list, retrieve and create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
    pub id: RecipeId,
    pub tags: Vec<Tag>,
    pub author: AuthorView,
    pub ingredients: Vec<IngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Write representation returned after a partial update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub author: UserId,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeRecord {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            author: recipe.author,
            ingredients: recipe.ingredients.lines().to_vec(),
            tags: recipe.tags.ids().to_vec(),
            image: recipe.image.as_str().to_string(),
            name: recipe.name.as_str().to_string(),
            text: recipe.text.as_str().to_string(),
            cooking_time: recipe.cooking_time.get(),
        }
    }
}

/// Compact card returned by favorite and shopping-cart endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortRecipe {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}
