//! Recipe Use Cases
//!
//! Listing, reading, creating, partially updating and deleting recipes.
//! Anyone may read; only the author may change or delete a recipe.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::fields::{FieldErrors, REQUIRED};
use kernel::id::{RecipeId, UserId};
use kernel::pagination::{Page, PageQuery};
use kernel::permission::{Access, author_or_read_only, require_authenticated};

use crate::application::config::RecipesConfig;
use crate::domain::entities::{Recipe, RecipeChanges};
use crate::domain::filter::RecipeFilter;
use crate::domain::repository::{CatalogRepository, RecipeQuery, RecipeRepository};
use crate::domain::value_objects::{
    CookingTime, IngredientList, RecipeImage, RecipeName, RecipeText, TagSet,
};
use crate::domain::view::{RecipeRecord, RecipeView};
use crate::error::{RecipeError, RecipeResult};

/// One entry of the submitted ingredient list
#[derive(Debug, Clone, Copy, Default)]
pub struct IngredientInput {
    pub id: Option<i64>,
    pub amount: Option<i64>,
}

/// Submitted recipe fields; all are required on create
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientInput>>,
}

/// Where the list was requested, for `next`/`previous` links
pub struct ListLocation<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

pub struct RecipeUseCase<R>
where
    R: RecipeRepository + RecipeQuery + CatalogRepository,
{
    repo: Arc<R>,
    config: Arc<RecipesConfig>,
}

impl<R> RecipeUseCase<R>
where
    R: RecipeRepository + RecipeQuery + CatalogRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<RecipesConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn list(
        &self,
        viewer: Option<UserId>,
        filter: RecipeFilter,
        query: PageQuery,
        location: ListLocation<'_>,
    ) -> RecipeResult<Page<RecipeView>> {
        let page = query.resolve(self.config.page_size, self.config.max_page_size)?;
        let (recipes, count) = self.repo.list_recipe_views(viewer, &filter, &page).await?;
        Ok(Page::new(recipes, count, &page, location.path, location.query)?)
    }

    pub async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> RecipeResult<RecipeView> {
        self.repo
            .find_recipe_view(viewer, id)
            .await?
            .ok_or(RecipeError::RecipeNotFound)
    }

    /// Create a recipe authored by the caller; returns the read representation
    pub async fn create(
        &self,
        caller: Option<UserId>,
        input: RecipeInput,
    ) -> RecipeResult<RecipeView> {
        let author = require_authenticated(caller)?;

        let mut errors = FieldErrors::new();
        for (field, present) in [
            ("name", input.name.is_some()),
            ("text", input.text.is_some()),
            ("image", input.image.is_some()),
            ("cooking_time", input.cooking_time.is_some()),
            ("tags", input.tags.is_some()),
            ("ingredients", input.ingredients.is_some()),
        ] {
            if !present {
                errors.add(field, REQUIRED);
            }
        }

        let changes = parse_changes(&mut errors, input);
        self.check_references(&mut errors, author, &changes, None)
            .await?;

        let draft = match changes.into_draft() {
            Some(draft) if errors.is_empty() => draft,
            _ => return Err(errors.into()),
        };

        let recipe = self.repo.create_recipe(author, draft).await?;

        tracing::info!(
            recipe_id = %recipe.id,
            author_id = %author,
            name = recipe.name.as_str(),
            "Recipe created"
        );

        self.get(Some(author), recipe.id).await
    }

    /// Partial update by the author; returns the write representation
    pub async fn update(
        &self,
        caller: Option<UserId>,
        id: RecipeId,
        input: RecipeInput,
    ) -> RecipeResult<RecipeRecord> {
        let caller = require_authenticated(caller)?;
        let mut recipe = self.owned_recipe(caller, id).await?;

        let mut errors = FieldErrors::new();
        let changes = parse_changes(&mut errors, input);
        self.check_references(&mut errors, recipe.author, &changes, Some(id))
            .await?;
        if !errors.is_empty() {
            return Err(errors.into());
        }

        recipe.apply(changes);
        self.repo.update_recipe(&recipe).await?;

        tracing::info!(recipe_id = %id, author_id = %caller, "Recipe updated");

        Ok(RecipeRecord::from(&recipe))
    }

    pub async fn delete(&self, caller: Option<UserId>, id: RecipeId) -> RecipeResult<()> {
        let caller = require_authenticated(caller)?;
        self.owned_recipe(caller, id).await?;

        self.repo.delete_recipe(id).await?;

        tracing::info!(recipe_id = %id, author_id = %caller, "Recipe deleted");
        Ok(())
    }

    async fn owned_recipe(&self, caller: UserId, id: RecipeId) -> RecipeResult<Recipe> {
        let recipe = self
            .repo
            .find_recipe(id)
            .await?
            .ok_or(RecipeError::RecipeNotFound)?;

        author_or_read_only(Access::Write, Some(caller), recipe.author)?;
        Ok(recipe)
    }

    /// Report unknown tags and ingredients and a taken name
    async fn check_references(
        &self,
        errors: &mut FieldErrors,
        author: UserId,
        changes: &RecipeChanges,
        except: Option<RecipeId>,
    ) -> RecipeResult<()> {
        if let Some(tags) = &changes.tags {
            for id in self.repo.missing_tags(tags.ids()).await? {
                errors.add("tags", does_not_exist(id));
            }
        }
        if let Some(ingredients) = &changes.ingredients {
            for id in self.repo.missing_ingredients(&ingredients.ids()).await? {
                errors.add("ingredients", does_not_exist(id));
            }
        }
        if let Some(name) = &changes.name {
            if self.repo.recipe_name_taken(author, name, except).await? {
                errors.add("name", "You already have a recipe with this name.");
            }
        }
        Ok(())
    }
}

fn does_not_exist(id: impl std::fmt::Display) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

/// Validate every present field, recording failures under its name
fn parse_changes(errors: &mut FieldErrors, input: RecipeInput) -> RecipeChanges {
    RecipeChanges {
        name: input
            .name
            .and_then(|raw| errors.check("name", RecipeName::new(raw))),
        text: input
            .text
            .and_then(|raw| errors.check("text", RecipeText::new(raw))),
        image: input
            .image
            .and_then(|raw| errors.check("image", RecipeImage::new(raw))),
        cooking_time: input
            .cooking_time
            .and_then(|minutes| errors.check("cooking_time", CookingTime::new(minutes))),
        tags: input
            .tags
            .and_then(|ids| errors.check("tags", TagSet::new(ids))),
        ingredients: input.ingredients.and_then(|lines| {
            errors.check(
                "ingredients",
                ingredient_pairs(lines).and_then(IngredientList::new),
            )
        }),
    }
}

fn ingredient_pairs(lines: Vec<IngredientInput>) -> AppResult<Vec<(i64, i64)>> {
    lines
        .into_iter()
        .map(|line| match (line.id, line.amount) {
            (Some(id), Some(amount)) => Ok((id, amount)),
            _ => Err(AppError::bad_request(
                "Each ingredient needs an id and an amount.",
            )),
        })
        .collect()
}
