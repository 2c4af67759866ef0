//! Catalog Use Case
//!
//! Tags and ingredients are reference data; they are only read here.

use std::sync::Arc;

use kernel::id::{IngredientId, TagId};

use crate::domain::entities::{Ingredient, Tag};
use crate::domain::repository::CatalogRepository;
use crate::error::{RecipeError, RecipeResult};

pub struct CatalogUseCase<R>
where
    R: CatalogRepository,
{
    repo: Arc<R>,
}

impl<R> CatalogUseCase<R>
where
    R: CatalogRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn tags(&self) -> RecipeResult<Vec<Tag>> {
        self.repo.list_tags().await
    }

    pub async fn tag(&self, id: TagId) -> RecipeResult<Tag> {
        self.repo.find_tag(id).await?.ok_or(RecipeError::TagNotFound)
    }

    /// Ingredients whose name starts with `name` (any case)
    pub async fn ingredients(&self, name: Option<&str>) -> RecipeResult<Vec<Ingredient>> {
        let prefix = name.map(str::trim).filter(|prefix| !prefix.is_empty());
        self.repo.list_ingredients(prefix).await
    }

    pub async fn ingredient(&self, id: IngredientId) -> RecipeResult<Ingredient> {
        self.repo
            .find_ingredient(id)
            .await?
            .ok_or(RecipeError::IngredientNotFound)
    }
}
