//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{IngredientId, RecipeId, TagId, UserId};
use kernel::pagination::PageRequest;

use super::entities::{Ingredient, Recipe, RecipeDraft, Tag};
use super::filter::RecipeFilter;
use super::services::ShoppingItem;
use super::value_objects::RecipeName;
use super::view::RecipeView;
use crate::error::RecipeResult;

/// Read-only reference data
#[trait_variant::make(CatalogRepository: Send)]
pub trait LocalCatalogRepository {
    async fn list_tags(&self) -> RecipeResult<Vec<Tag>>;

    async fn find_tag(&self, id: TagId) -> RecipeResult<Option<Tag>>;

    /// Ingredients ordered by name, optionally by case-insensitive name prefix
    async fn list_ingredients(&self, name_prefix: Option<&str>) -> RecipeResult<Vec<Ingredient>>;

    async fn find_ingredient(&self, id: IngredientId) -> RecipeResult<Option<Ingredient>>;

    /// Ids among `ids` that do not exist
    async fn missing_tags(&self, ids: &[TagId]) -> RecipeResult<Vec<TagId>>;

    /// Ids among `ids` that do not exist
    async fn missing_ingredients(&self, ids: &[IngredientId]) -> RecipeResult<Vec<IngredientId>>;
}

/// Recipe storage
#[trait_variant::make(RecipeRepository: Send)]
pub trait LocalRecipeRepository {
    /// Insert the recipe with its tags and ingredient amounts
    async fn create_recipe(&self, author: UserId, draft: RecipeDraft) -> RecipeResult<Recipe>;

    async fn find_recipe(&self, id: RecipeId) -> RecipeResult<Option<Recipe>>;

    /// Persist fields, replacing tags and ingredient amounts
    async fn update_recipe(&self, recipe: &Recipe) -> RecipeResult<()>;

    /// Delete the recipe; favorites and cart entries cascade
    async fn delete_recipe(&self, id: RecipeId) -> RecipeResult<bool>;

    /// Whether `author` has another recipe (other than `except`) named `name`
    async fn recipe_name_taken(
        &self,
        author: UserId,
        name: &RecipeName,
        except: Option<RecipeId>,
    ) -> RecipeResult<bool>;
}

/// Viewer-dependent recipe reads
#[trait_variant::make(RecipeQuery: Send)]
pub trait LocalRecipeQuery {
    /// One page of matching recipes, newest first, with the total count
    async fn list_recipe_views(
        &self,
        viewer: Option<UserId>,
        filter: &RecipeFilter,
        page: &PageRequest,
    ) -> RecipeResult<(Vec<RecipeView>, i64)>;

    async fn find_recipe_view(
        &self,
        viewer: Option<UserId>,
        id: RecipeId,
    ) -> RecipeResult<Option<RecipeView>>;
}

/// Ingredients needed for the recipes in a cart
#[trait_variant::make(ShoppingListQuery: Send)]
pub trait LocalShoppingListQuery {
    /// Ingredient amounts of the cart, ordered by ingredient name
    ///
    /// Rows may repeat a (name, unit) pair; the list sums them.
    async fn shopping_items(&self, user: UserId) -> RecipeResult<Vec<ShoppingItem>>;
}
