//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use kernel::extract::{JsonBody, PathParam, Query, QueryParams, WithRejection};
use kernel::id::{IngredientId, RecipeId, TagId};
use kernel::identity::{CurrentUser, MaybeUser};
use kernel::pagination::Page;
use kernel::relation::RelationRepository;

use crate::application::config::RecipesConfig;
use crate::application::{CatalogUseCase, ListLocation, RecipeUseCase, ShoppingListUseCase};
use crate::domain::entities::{Ingredient, Tag};
use crate::domain::filter::RecipeFilter;
use crate::domain::relations::{Favorite, ShoppingCart};
use crate::domain::repository::{
    CatalogRepository, RecipeQuery, RecipeRepository, ShoppingListQuery,
};
use crate::domain::view::{RecipeRecord, RecipeView};
use crate::error::{RecipeError, RecipeResult};
use crate::presentation::dto::{IngredientSearch, RecipeListQuery, RecipeRequest};

/// Every storage capability the recipes endpoints need
pub trait RecipesBackend:
    CatalogRepository
    + RecipeRepository
    + RecipeQuery
    + ShoppingListQuery
    + RelationRepository<Favorite>
    + RelationRepository<ShoppingCart>
    + Send
    + Sync
    + 'static
{
}

impl<T> RecipesBackend for T where
    T: CatalogRepository
        + RecipeRepository
        + RecipeQuery
        + ShoppingListQuery
        + RelationRepository<Favorite>
        + RelationRepository<ShoppingCart>
        + Send
        + Sync
        + 'static
{
}

/// Shared state for recipes handlers
pub struct RecipesAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<RecipesConfig>,
}

impl<R> Clone for RecipesAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R: RecipesBackend> RecipesAppState<R> {
    fn recipes(&self) -> RecipeUseCase<R> {
        RecipeUseCase::new(self.repo.clone(), self.config.clone())
    }

    fn catalog(&self) -> CatalogUseCase<R> {
        CatalogUseCase::new(self.repo.clone())
    }
}

// ============================================================================
// Tags and ingredients
// ============================================================================

/// GET /api/tags
pub async fn list_tags<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
) -> RecipeResult<Json<Vec<Tag>>> {
    Ok(Json(state.catalog().tags().await?))
}

/// GET /api/tags/{id}
pub async fn get_tag<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    WithRejection(Path(id), _): PathParam<i64>,
) -> RecipeResult<Json<Tag>> {
    Ok(Json(state.catalog().tag(TagId::from_raw(id)).await?))
}

/// GET /api/ingredients
pub async fn list_ingredients<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    WithRejection(Query(search), _): QueryParams<IngredientSearch>,
) -> RecipeResult<Json<Vec<Ingredient>>> {
    let ingredients = state
        .catalog()
        .ingredients(search.name.as_deref())
        .await?;
    Ok(Json(ingredients))
}

/// GET /api/ingredients/{id}
pub async fn get_ingredient<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    WithRejection(Path(id), _): PathParam<i64>,
) -> RecipeResult<Json<Ingredient>> {
    Ok(Json(
        state
            .catalog()
            .ingredient(IngredientId::from_raw(id))
            .await?,
    ))
}

// ============================================================================
// Recipes
// ============================================================================

/// GET /api/recipes
pub async fn list_recipes<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    viewer: MaybeUser,
    uri: OriginalUri,
    WithRejection(Query(query), _): QueryParams<RecipeListQuery>,
) -> RecipeResult<Json<Page<RecipeView>>> {
    let filter = RecipeFilter::new(
        viewer.id(),
        query.tags.clone(),
        query.author(),
        query.is_favorited(),
        query.is_in_shopping_cart(),
    );
    let location = ListLocation {
        path: uri.path(),
        query: uri.query(),
    };

    let page = state
        .recipes()
        .list(viewer.id(), filter, query.page_query(), location)
        .await?;
    Ok(Json(page))
}

/// POST /api/recipes
pub async fn create_recipe<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    caller: MaybeUser,
    WithRejection(Json(req), _): JsonBody<RecipeRequest>,
) -> RecipeResult<(StatusCode, Json<RecipeView>)> {
    let recipe = state.recipes().create(caller.id(), req.into()).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/recipes/{id}
pub async fn get_recipe<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    viewer: MaybeUser,
    WithRejection(Path(id), _): PathParam<i64>,
) -> RecipeResult<Json<RecipeView>> {
    let recipe = state
        .recipes()
        .get(viewer.id(), RecipeId::from_raw(id))
        .await?;
    Ok(Json(recipe))
}

/// PUT /api/recipes/{id}
pub async fn replace_recipe() -> RecipeError {
    RecipeError::MethodNotAllowed
}

/// PATCH /api/recipes/{id}
pub async fn update_recipe<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    caller: MaybeUser,
    WithRejection(Path(id), _): PathParam<i64>,
    WithRejection(Json(req), _): JsonBody<RecipeRequest>,
) -> RecipeResult<Json<RecipeRecord>> {
    let recipe = state
        .recipes()
        .update(caller.id(), RecipeId::from_raw(id), req.into())
        .await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/{id}
pub async fn delete_recipe<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    caller: MaybeUser,
    WithRejection(Path(id), _): PathParam<i64>,
) -> RecipeResult<StatusCode> {
    state
        .recipes()
        .delete(caller.id(), RecipeId::from_raw(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Shopping list
// ============================================================================

/// GET /api/recipes/download_shopping_cart
///
/// Plain-text attachment; an empty cart yields a single explanatory line.
pub async fn download_shopping_cart<R: RecipesBackend>(
    State(state): State<RecipesAppState<R>>,
    CurrentUser(user): CurrentUser,
) -> RecipeResult<impl IntoResponse> {
    let list = ShoppingListUseCase::new(state.repo.clone())
        .execute(user)
        .await?;

    let disposition = HeaderValue::from_str(&state.config.attachment_disposition())
        .map_err(|e| RecipeError::Internal(format!("Invalid attachment header: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        list.render(),
    ))
}
