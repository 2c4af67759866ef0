//! Recipes Router

use std::sync::Arc;

use axum::{Router, routing::get};
use kernel::relation;

use crate::application::config::RecipesConfig;
use crate::domain::relations::{Favorite, ShoppingCart};
use crate::infra::postgres::PgRecipeRepository;
use crate::presentation::handlers::{self, RecipesAppState, RecipesBackend};

/// Create the recipes router with PostgreSQL repository
pub fn recipes_router(repo: Arc<PgRecipeRepository>, config: Arc<RecipesConfig>) -> Router {
    recipes_router_generic(repo, config)
}

/// Create a recipes router for any repository implementation
pub fn recipes_router_generic<R>(repo: Arc<R>, config: Arc<RecipesConfig>) -> Router
where
    R: RecipesBackend,
{
    let state = RecipesAppState {
        repo: repo.clone(),
        config,
    };

    Router::new()
        .route("/tags", get(handlers::list_tags::<R>))
        .route("/tags/{id}", get(handlers::get_tag::<R>))
        .route("/ingredients", get(handlers::list_ingredients::<R>))
        .route("/ingredients/{id}", get(handlers::get_ingredient::<R>))
        .route(
            "/recipes",
            get(handlers::list_recipes::<R>).post(handlers::create_recipe::<R>),
        )
        .route(
            "/recipes/download_shopping_cart",
            get(handlers::download_shopping_cart::<R>),
        )
        .route(
            "/recipes/{id}",
            get(handlers::get_recipe::<R>)
                .put(handlers::replace_recipe)
                .patch(handlers::update_recipe::<R>)
                .delete(handlers::delete_recipe::<R>),
        )
        .with_state(state)
        .merge(relation::routes::<Favorite, R>(
            "/recipes/{id}/favorite",
            repo.clone(),
        ))
        .merge(relation::routes::<ShoppingCart, R>(
            "/recipes/{id}/shopping_cart",
            repo,
        ))
}
