//! In-memory repository for handler and use-case tests

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{IngredientId, RecipeId, TagId, UserId};
use kernel::pagination::PageRequest;
use kernel::relation::{NoParams, RelationRepository};

use crate::domain::entities::{Ingredient, Recipe, RecipeDraft, Tag};
use crate::domain::filter::RecipeFilter;
use crate::domain::relations::{Favorite, ShoppingCart};
use crate::domain::repository::{
    CatalogRepository, RecipeQuery, RecipeRepository, ShoppingListQuery,
};
use crate::domain::services::ShoppingItem;
use crate::domain::value_objects::RecipeName;
use crate::domain::view::{AuthorView, IngredientLine, RecipeView, ShortRecipe};
use crate::error::RecipeResult;

#[derive(Default)]
struct State {
    next_id: i64,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    authors: Vec<AuthorView>,
    /// (user, author)
    subscriptions: HashSet<(UserId, UserId)>,
    recipes: Vec<Recipe>,
    favorites: HashSet<(UserId, RecipeId)>,
    carts: HashSet<(UserId, RecipeId)>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn view(&self, viewer: Option<UserId>, recipe: &Recipe) -> RecipeView {
        let marked = |set: &HashSet<(UserId, RecipeId)>| {
            viewer.is_some_and(|user| set.contains(&(user, recipe.id)))
        };
        let author = self
            .authors
            .iter()
            .find(|author| author.id == recipe.author)
            .cloned()
            .map(|mut author| {
                author.is_subscribed = viewer
                    .is_some_and(|user| self.subscriptions.contains(&(user, recipe.author)));
                author
            })
            .unwrap_or_else(|| AuthorView {
                email: String::new(),
                id: recipe.author,
                username: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                is_subscribed: false,
            });

        RecipeView {
            id: recipe.id,
            tags: recipe
                .tags
                .ids()
                .iter()
                .filter_map(|id| self.tags.iter().find(|tag| tag.id == *id).cloned())
                .collect(),
            author,
            ingredients: recipe
                .ingredients
                .lines()
                .iter()
                .filter_map(|line| {
                    let ingredient = self.ingredients.iter().find(|i| i.id == line.id)?;
                    Some(IngredientLine {
                        id: ingredient.id,
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: line.amount.get(),
                    })
                })
                .collect(),
            is_favorited: marked(&self.favorites),
            is_in_shopping_cart: marked(&self.carts),
            name: recipe.name.as_str().to_string(),
            image: recipe.image.as_str().to_string(),
            text: recipe.text.as_str().to_string(),
            cooking_time: recipe.cooking_time.get(),
        }
    }

    fn matches(&self, filter: &RecipeFilter, recipe: &Recipe) -> bool {
        let tagged = filter.tags.is_empty()
            || recipe.tags.ids().iter().any(|id| {
                self.tags
                    .iter()
                    .any(|tag| tag.id == *id && filter.tags.contains(&tag.slug))
            });

        tagged
            && filter.author.is_none_or(|author| recipe.author == author)
            && filter
                .favorited_by
                .is_none_or(|user| self.favorites.contains(&(user, recipe.id)))
            && filter
                .in_cart_of
                .is_none_or(|user| self.carts.contains(&(user, recipe.id)))
    }
}

#[derive(Clone, Default)]
pub struct MemoryRecipeRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryRecipeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_tag(&self, name: &str, color: &str, slug: &str) -> TagId {
        let mut state = self.lock();
        let id = TagId::from_raw(state.next_id());
        state.tags.push(Tag {
            id,
            name: name.to_string(),
            color: color.to_string(),
            slug: slug.to_string(),
        });
        id
    }

    pub fn add_ingredient(&self, name: &str, measurement_unit: &str) -> IngredientId {
        let mut state = self.lock();
        let id = IngredientId::from_raw(state.next_id());
        state.ingredients.push(Ingredient {
            id,
            name: name.to_string(),
            measurement_unit: measurement_unit.to_string(),
        });
        id
    }

    pub fn add_author(&self, username: &str) -> UserId {
        let mut state = self.lock();
        let id = UserId::from_raw(state.next_id());
        state.authors.push(AuthorView {
            email: format!("{username}@example.com"),
            id,
            username: username.to_string(),
            first_name: username.to_string(),
            last_name: "Cook".to_string(),
            is_subscribed: false,
        });
        id
    }

    pub fn subscribe(&self, user: UserId, author: UserId) {
        self.lock().subscriptions.insert((user, author));
    }
}

impl CatalogRepository for MemoryRecipeRepository {
    async fn list_tags(&self) -> RecipeResult<Vec<Tag>> {
        Ok(self.lock().tags.clone())
    }

    async fn find_tag(&self, id: TagId) -> RecipeResult<Option<Tag>> {
        Ok(self.lock().tags.iter().find(|tag| tag.id == id).cloned())
    }

    async fn list_ingredients(&self, name_prefix: Option<&str>) -> RecipeResult<Vec<Ingredient>> {
        let prefix = name_prefix.map(str::to_lowercase);
        let mut ingredients: Vec<Ingredient> = self
            .lock()
            .ingredients
            .iter()
            .filter(|i| {
                prefix
                    .as_deref()
                    .is_none_or(|prefix| i.name.to_lowercase().starts_with(prefix))
            })
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.get().cmp(&b.id.get())));
        Ok(ingredients)
    }

    async fn find_ingredient(&self, id: IngredientId) -> RecipeResult<Option<Ingredient>> {
        Ok(self.lock().ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn missing_tags(&self, ids: &[TagId]) -> RecipeResult<Vec<TagId>> {
        let state = self.lock();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.tags.iter().any(|tag| tag.id == *id))
            .collect())
    }

    async fn missing_ingredients(&self, ids: &[IngredientId]) -> RecipeResult<Vec<IngredientId>> {
        let state = self.lock();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.ingredients.iter().any(|i| i.id == *id))
            .collect())
    }
}

impl RecipeRepository for MemoryRecipeRepository {
    async fn create_recipe(&self, author: UserId, draft: RecipeDraft) -> RecipeResult<Recipe> {
        let mut state = self.lock();
        let id = state.next_id();
        // Distinct timestamps keep newest-first ordering stable
        let created_at = Utc::now() + Duration::milliseconds(id);
        let recipe = Recipe::from_draft(RecipeId::from_raw(id), author, draft, created_at);
        state.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn find_recipe(&self, id: RecipeId) -> RecipeResult<Option<Recipe>> {
        Ok(self.lock().recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn update_recipe(&self, recipe: &Recipe) -> RecipeResult<()> {
        let mut state = self.lock();
        if let Some(stored) = state.recipes.iter_mut().find(|r| r.id == recipe.id) {
            *stored = recipe.clone();
        }
        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> RecipeResult<bool> {
        let mut state = self.lock();
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);
        state.favorites.retain(|(_, recipe)| *recipe != id);
        state.carts.retain(|(_, recipe)| *recipe != id);
        Ok(state.recipes.len() < before)
    }

    async fn recipe_name_taken(
        &self,
        author: UserId,
        name: &RecipeName,
        except: Option<RecipeId>,
    ) -> RecipeResult<bool> {
        Ok(self.lock().recipes.iter().any(|r| {
            r.author == author && r.name == *name && Some(r.id) != except
        }))
    }
}

impl RecipeQuery for MemoryRecipeRepository {
    async fn list_recipe_views(
        &self,
        viewer: Option<UserId>,
        filter: &RecipeFilter,
        page: &PageRequest,
    ) -> RecipeResult<(Vec<RecipeView>, i64)> {
        let state = self.lock();
        let mut matching: Vec<&Recipe> = state
            .recipes
            .iter()
            .filter(|recipe| state.matches(filter, recipe))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.get().cmp(&a.id.get()))
        });

        let count = matching.len() as i64;
        let views = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|recipe| state.view(viewer, recipe))
            .collect();
        Ok((views, count))
    }

    async fn find_recipe_view(
        &self,
        viewer: Option<UserId>,
        id: RecipeId,
    ) -> RecipeResult<Option<RecipeView>> {
        let state = self.lock();
        Ok(state
            .recipes
            .iter()
            .find(|r| r.id == id)
            .map(|recipe| state.view(viewer, recipe)))
    }
}

impl ShoppingListQuery for MemoryRecipeRepository {
    async fn shopping_items(&self, user: UserId) -> RecipeResult<Vec<ShoppingItem>> {
        let state = self.lock();
        let mut items: Vec<ShoppingItem> = state
            .recipes
            .iter()
            .filter(|recipe| state.carts.contains(&(user, recipe.id)))
            .flat_map(|recipe| recipe.ingredients.lines())
            .filter_map(|line| {
                let ingredient = state.ingredients.iter().find(|i| i.id == line.id)?;
                Some(ShoppingItem {
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    amount: i64::from(line.amount.get()),
                })
            })
            .collect();

        // Case-insensitive like the database collation
        items.sort_by(|a, b| {
            (a.name.to_lowercase(), &a.name, &a.measurement_unit)
                .cmp(&(b.name.to_lowercase(), &b.name, &b.measurement_unit))
        });
        Ok(items)
    }
}

impl MemoryRecipeRepository {
    fn short_recipe(&self, id: RecipeId) -> AppResult<ShortRecipe> {
        self.lock()
            .recipes
            .iter()
            .find(|r| r.id == id)
            .map(|recipe| ShortRecipe {
                id: recipe.id,
                name: recipe.name.as_str().to_string(),
                image: recipe.image.as_str().to_string(),
                cooking_time: recipe.cooking_time.get(),
            })
            .ok_or_else(|| AppError::not_found("Recipe not found"))
    }

    fn recipe_exists(&self, id: RecipeId) -> bool {
        self.lock().recipes.iter().any(|r| r.id == id)
    }
}

impl RelationRepository<Favorite> for MemoryRecipeRepository {
    async fn target_exists(&self, recipe: RecipeId) -> AppResult<bool> {
        Ok(self.recipe_exists(recipe))
    }

    async fn relation_exists(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        Ok(self.lock().favorites.contains(&(user, recipe)))
    }

    async fn insert_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<()> {
        self.lock().favorites.insert((user, recipe));
        Ok(())
    }

    async fn remove_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        Ok(self.lock().favorites.remove(&(user, recipe)))
    }

    async fn represent(
        &self,
        _user: UserId,
        recipe: RecipeId,
        _params: &NoParams,
    ) -> AppResult<ShortRecipe> {
        self.short_recipe(recipe)
    }
}

impl RelationRepository<ShoppingCart> for MemoryRecipeRepository {
    async fn target_exists(&self, recipe: RecipeId) -> AppResult<bool> {
        Ok(self.recipe_exists(recipe))
    }

    async fn relation_exists(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        Ok(self.lock().carts.contains(&(user, recipe)))
    }

    async fn insert_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<()> {
        self.lock().carts.insert((user, recipe));
        Ok(())
    }

    async fn remove_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        Ok(self.lock().carts.remove(&(user, recipe)))
    }

    async fn represent(
        &self,
        _user: UserId,
        recipe: RecipeId,
        _params: &NoParams,
    ) -> AppResult<ShortRecipe> {
        self.short_recipe(recipe)
    }
}
