//! Recipe relations
//!
//! Favorites and shopping-cart entries link the caller to a recipe through
//! the shared create/destroy flow in [`kernel::relation`].

use kernel::id::RecipeId;
use kernel::relation::{NoParams, RelationKind};

use super::view::ShortRecipe;

pub struct Favorite;

impl RelationKind for Favorite {
    type Target = RecipeId;
    type Output = ShortRecipe;
    type Params = NoParams;

    const NAME: &'static str = "favorite";
    const TARGET_LABEL: &'static str = "Recipe";
    const DUPLICATE_MESSAGE: &'static str = "Recipe is already in favorites.";
}

pub struct ShoppingCart;

impl RelationKind for ShoppingCart {
    type Target = RecipeId;
    type Output = ShortRecipe;
    type Params = NoParams;

    const NAME: &'static str = "shopping_cart";
    const TARGET_LABEL: &'static str = "Recipe";
    const DUPLICATE_MESSAGE: &'static str = "Recipe is already in the shopping cart.";
}
