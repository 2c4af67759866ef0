//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{IngredientId, RecipeId, TagId, UserId};
use kernel::pagination::PageRequest;
use kernel::relation::RelationRepository;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{Ingredient, Recipe, RecipeDraft, Tag};
use crate::domain::filter::RecipeFilter;
use crate::domain::relations::{Favorite, ShoppingCart};
use crate::domain::repository::{
    CatalogRepository, RecipeQuery, RecipeRepository, ShoppingListQuery,
};
use crate::domain::services::ShoppingItem;
use crate::domain::value_objects::{
    Amount, CookingTime, IngredientAmount, IngredientList, RecipeImage, RecipeName, RecipeText,
    TagSet,
};
use crate::domain::view::{AuthorView, IngredientLine, RecipeView, ShortRecipe};
use crate::error::RecipeResult;

/// `WHERE` clause shared by the recipe list and its count
///
/// $1 author, $2 tag slugs, $3 favorited by, $4 in cart of
const RECIPE_FILTER: &str = r#"
    WHERE ($1::bigint IS NULL OR r.author_id = $1)
      AND (cardinality($2::text[]) = 0 OR EXISTS (
            SELECT 1 FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = r.id AND t.slug = ANY($2)))
      AND ($3::bigint IS NULL OR EXISTS (
            SELECT 1 FROM favorites f
            WHERE f.recipe_id = r.id AND f.user_id = $3))
      AND ($4::bigint IS NULL OR EXISTS (
            SELECT 1 FROM shopping_carts c
            WHERE c.recipe_id = r.id AND c.user_id = $4))
"#;

/// PostgreSQL-backed recipes repository
#[derive(Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replace_links(
        tx: &mut Transaction<'_, Postgres>,
        recipe: i64,
        tags: &TagSet,
        ingredients: &IngredientList,
    ) -> RecipeResult<()> {
        let tag_ids: Vec<i64> = tags.ids().iter().map(|id| id.get()).collect();
        let ingredient_ids: Vec<i64> = ingredients.lines().iter().map(|l| l.id.get()).collect();
        let amounts: Vec<i32> = ingredients.lines().iter().map(|l| l.amount.get()).collect();

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM ingredient_amounts WHERE recipe_id = $1")
            .bind(recipe)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) SELECT $1, UNNEST($2::bigint[])",
        )
        .bind(recipe)
        .bind(&tag_ids)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO ingredient_amounts (recipe_id, ingredient_id, amount)
            SELECT $1, line.ingredient_id, line.amount
            FROM UNNEST($2::bigint[], $3::int[]) AS line(ingredient_id, amount)
            "#,
        )
        .bind(recipe)
        .bind(&ingredient_ids)
        .bind(&amounts)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Read representations of `ids`, in the order given
    async fn load_views(&self, viewer: Option<UserId>, ids: &[i64]) -> RecipeResult<Vec<RecipeView>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let viewer = viewer.map(|id| id.get());

        let rows = sqlx::query_as::<_, RecipeViewRow>(
            r#"
            SELECT
                r.id,
                r.name,
                r.image,
                r.text,
                r.cooking_time,
                u.id AS author_id,
                u.email AS author_email,
                u.username AS author_username,
                u.first_name AS author_first_name,
                u.last_name AS author_last_name,
                EXISTS(
                    SELECT 1 FROM subscriptions s
                    WHERE s.user_id = $2 AND s.author_id = u.id
                ) AS author_is_subscribed,
                EXISTS(
                    SELECT 1 FROM favorites f
                    WHERE f.user_id = $2 AND f.recipe_id = r.id
                ) AS is_favorited,
                EXISTS(
                    SELECT 1 FROM shopping_carts c
                    WHERE c.user_id = $2 AND c.recipe_id = r.id
                ) AS is_in_shopping_cart
            FROM recipes r
            JOIN users u ON u.id = r.author_id
            WHERE r.id = ANY($1)
            "#,
        )
        .bind(ids)
        .bind(viewer)
        .fetch_all(&self.pool)
        .await?;

        let tag_rows = sqlx::query_as::<_, RecipeTagRow>(
            r#"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY t.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let line_rows = sqlx::query_as::<_, IngredientLineRow>(
            r#"
            SELECT ia.recipe_id, i.id, i.name, i.measurement_unit, ia.amount
            FROM ingredient_amounts ia
            JOIN ingredients i ON i.id = ia.ingredient_id
            WHERE ia.recipe_id = ANY($1)
            ORDER BY ia.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags.entry(row.recipe_id).or_default().push(row.into_tag());
        }
        let mut lines: HashMap<i64, Vec<IngredientLine>> = HashMap::new();
        for row in line_rows {
            lines.entry(row.recipe_id).or_default().push(row.into_line());
        }
        let mut views: HashMap<i64, RecipeView> = rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                let view = row.into_view(
                    tags.remove(&id).unwrap_or_default(),
                    lines.remove(&id).unwrap_or_default(),
                );
                (id, view)
            })
            .collect();

        Ok(ids.iter().filter_map(|id| views.remove(id)).collect())
    }

    async fn short_recipe(&self, id: RecipeId) -> AppResult<ShortRecipe> {
        let row = sqlx::query_as::<_, ShortRecipeRow>(
            "SELECT id, name, image, cooking_time FROM recipes WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShortRecipeRow::into_short)
            .ok_or_else(|| AppError::not_found("Recipe not found"))
    }

    async fn recipe_exists(&self, id: RecipeId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM recipes WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn link_exists(&self, table: &'static str, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE user_id = $1 AND recipe_id = $2)"
        ))
        .bind(user.get())
        .bind(recipe.get())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_link(&self, table: &'static str, user: UserId, recipe: RecipeId) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO {table} (user_id, recipe_id, created_at) VALUES ($1, $2, $3)"
        ))
        .bind(user.get())
        .bind(recipe.get())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_link(&self, table: &'static str, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        let deleted = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND recipe_id = $2"
        ))
        .bind(user.get())
        .bind(recipe.get())
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(deleted > 0)
    }
}

/// Escape `%`, `_` and `\` so a user-supplied prefix matches literally
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// ============================================================================
// Catalog
// ============================================================================

impl CatalogRepository for PgRecipeRepository {
    async fn list_tags(&self) -> RecipeResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagRow>("SELECT id, name, color, slug FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TagRow::into_tag).collect())
    }

    async fn find_tag(&self, id: TagId) -> RecipeResult<Option<Tag>> {
        let row = sqlx::query_as::<_, TagRow>("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TagRow::into_tag))
    }

    async fn list_ingredients(&self, name_prefix: Option<&str>) -> RecipeResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE $1::text IS NULL OR lower(name) LIKE lower($1)
            ORDER BY name, id
            "#,
        )
        .bind(name_prefix.map(like_prefix))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(IngredientRow::into_ingredient).collect())
    }

    async fn find_ingredient(&self, id: IngredientId) -> RecipeResult<Option<Ingredient>> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(IngredientRow::into_ingredient))
    }

    async fn missing_tags(&self, ids: &[TagId]) -> RecipeResult<Vec<TagId>> {
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let missing: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT req.id
            FROM UNNEST($1::bigint[]) AS req(id)
            WHERE NOT EXISTS (SELECT 1 FROM tags t WHERE t.id = req.id)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(missing.into_iter().map(TagId::from_raw).collect())
    }

    async fn missing_ingredients(&self, ids: &[IngredientId]) -> RecipeResult<Vec<IngredientId>> {
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let missing: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT req.id
            FROM UNNEST($1::bigint[]) AS req(id)
            WHERE NOT EXISTS (SELECT 1 FROM ingredients i WHERE i.id = req.id)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(missing.into_iter().map(IngredientId::from_raw).collect())
    }
}

// ============================================================================
// Recipe Repository Implementation
// ============================================================================

impl RecipeRepository for PgRecipeRepository {
    async fn create_recipe(&self, author: UserId, draft: RecipeDraft) -> RecipeResult<Recipe> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO recipes (author_id, name, image, text, cooking_time, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(author.get())
        .bind(draft.name.as_str())
        .bind(draft.image.as_str())
        .bind(draft.text.as_str())
        .bind(draft.cooking_time.get())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_links(&mut tx, id, &draft.tags, &draft.ingredients).await?;
        tx.commit().await?;

        Ok(Recipe::from_draft(RecipeId::from_raw(id), author, draft, now))
    }

    async fn find_recipe(&self, id: RecipeId) -> RecipeResult<Option<Recipe>> {
        let Some(row) = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, author_id, name, image, text, cooking_time, created_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let tags: Vec<i64> =
            sqlx::query_scalar("SELECT tag_id FROM recipe_tags WHERE recipe_id = $1 ORDER BY id")
                .bind(id.get())
                .fetch_all(&self.pool)
                .await?;

        let lines = sqlx::query_as::<_, AmountRow>(
            "SELECT ingredient_id, amount FROM ingredient_amounts WHERE recipe_id = $1 ORDER BY id",
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_recipe(tags, lines)))
    }

    async fn update_recipe(&self, recipe: &Recipe) -> RecipeResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE recipes SET
                name = $2,
                image = $3,
                text = $4,
                cooking_time = $5
            WHERE id = $1
            "#,
        )
        .bind(recipe.id.get())
        .bind(recipe.name.as_str())
        .bind(recipe.image.as_str())
        .bind(recipe.text.as_str())
        .bind(recipe.cooking_time.get())
        .execute(&mut *tx)
        .await?;

        Self::replace_links(&mut tx, recipe.id.get(), &recipe.tags, &recipe.ingredients).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> RecipeResult<bool> {
        let deleted = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn recipe_name_taken(
        &self,
        author: UserId,
        name: &RecipeName,
        except: Option<RecipeId>,
    ) -> RecipeResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM recipes
                WHERE author_id = $1 AND name = $2 AND id IS DISTINCT FROM $3
            )
            "#,
        )
        .bind(author.get())
        .bind(name.as_str())
        .bind(except.map(|id| id.get()))
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }
}

// ============================================================================
// Recipe Queries
// ============================================================================

impl RecipeQuery for PgRecipeRepository {
    async fn list_recipe_views(
        &self,
        viewer: Option<UserId>,
        filter: &RecipeFilter,
        page: &PageRequest,
    ) -> RecipeResult<(Vec<RecipeView>, i64)> {
        let author = filter.author.map(|id| id.get());
        let favorited_by = filter.favorited_by.map(|id| id.get());
        let in_cart_of = filter.in_cart_of.map(|id| id.get());

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM recipes r {RECIPE_FILTER}"
        ))
        .bind(author)
        .bind(&filter.tags)
        .bind(favorited_by)
        .bind(in_cart_of)
        .fetch_one(&self.pool)
        .await?;

        let ids: Vec<i64> = sqlx::query_scalar(&format!(
            "SELECT r.id FROM recipes r {RECIPE_FILTER} \
             ORDER BY r.created_at DESC, r.id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(author)
        .bind(&filter.tags)
        .bind(favorited_by)
        .bind(in_cart_of)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((self.load_views(viewer, &ids).await?, count))
    }

    async fn find_recipe_view(
        &self,
        viewer: Option<UserId>,
        id: RecipeId,
    ) -> RecipeResult<Option<RecipeView>> {
        Ok(self.load_views(viewer, &[id.get()]).await?.pop())
    }
}

impl ShoppingListQuery for PgRecipeRepository {
    async fn shopping_items(&self, user: UserId) -> RecipeResult<Vec<ShoppingItem>> {
        let rows = sqlx::query_as::<_, ShoppingItemRow>(
            r#"
            SELECT i.name, i.measurement_unit, SUM(ia.amount)::bigint AS amount
            FROM shopping_carts c
            JOIN ingredient_amounts ia ON ia.recipe_id = c.recipe_id
            JOIN ingredients i ON i.id = ia.ingredient_id
            WHERE c.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            "#,
        )
        .bind(user.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ShoppingItem {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}

// ============================================================================
// Favorite / Shopping cart relations
// ============================================================================

impl RelationRepository<Favorite> for PgRecipeRepository {
    async fn target_exists(&self, recipe: RecipeId) -> AppResult<bool> {
        self.recipe_exists(recipe).await
    }

    async fn relation_exists(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        self.link_exists("favorites", user, recipe).await
    }

    async fn insert_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<()> {
        self.insert_link("favorites", user, recipe).await
    }

    async fn remove_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        self.remove_link("favorites", user, recipe).await
    }

    async fn represent(
        &self,
        _user: UserId,
        recipe: RecipeId,
        _params: &kernel::relation::NoParams,
    ) -> AppResult<ShortRecipe> {
        self.short_recipe(recipe).await
    }
}

impl RelationRepository<ShoppingCart> for PgRecipeRepository {
    async fn target_exists(&self, recipe: RecipeId) -> AppResult<bool> {
        self.recipe_exists(recipe).await
    }

    async fn relation_exists(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        self.link_exists("shopping_carts", user, recipe).await
    }

    async fn insert_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<()> {
        self.insert_link("shopping_carts", user, recipe).await
    }

    async fn remove_relation(&self, user: UserId, recipe: RecipeId) -> AppResult<bool> {
        self.remove_link("shopping_carts", user, recipe).await
    }

    async fn represent(
        &self,
        _user: UserId,
        recipe: RecipeId,
        _params: &kernel::relation::NoParams,
    ) -> AppResult<ShortRecipe> {
        self.short_recipe(recipe).await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    name: String,
    color: String,
    slug: String,
}

impl TagRow {
    fn into_tag(self) -> Tag {
        Tag {
            id: TagId::from_raw(self.id),
            name: self.name,
            color: self.color,
            slug: self.slug,
        }
    }
}

#[derive(sqlx::FromRow)]
struct IngredientRow {
    id: i64,
    name: String,
    measurement_unit: String,
}

impl IngredientRow {
    fn into_ingredient(self) -> Ingredient {
        Ingredient {
            id: IngredientId::from_raw(self.id),
            name: self.name,
            measurement_unit: self.measurement_unit,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    author_id: i64,
    name: String,
    image: String,
    text: String,
    cooking_time: i32,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct AmountRow {
    ingredient_id: i64,
    amount: i32,
}

impl RecipeRow {
    fn into_recipe(self, tags: Vec<i64>, lines: Vec<AmountRow>) -> Recipe {
        Recipe {
            id: RecipeId::from_raw(self.id),
            author: UserId::from_raw(self.author_id),
            name: RecipeName::from_db(self.name),
            text: RecipeText::from_db(self.text),
            image: RecipeImage::from_db(self.image),
            cooking_time: CookingTime::from_db(self.cooking_time),
            tags: TagSet::from_db(tags.into_iter().map(TagId::from_raw).collect()),
            ingredients: IngredientList::from_db(
                lines
                    .into_iter()
                    .map(|line| IngredientAmount {
                        id: IngredientId::from_raw(line.ingredient_id),
                        amount: Amount::from_db(line.amount),
                    })
                    .collect(),
            ),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecipeViewRow {
    id: i64,
    name: String,
    image: String,
    text: String,
    cooking_time: i32,
    author_id: i64,
    author_email: String,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    author_is_subscribed: bool,
    is_favorited: bool,
    is_in_shopping_cart: bool,
}

impl RecipeViewRow {
    fn into_view(self, tags: Vec<Tag>, ingredients: Vec<IngredientLine>) -> RecipeView {
        RecipeView {
            id: RecipeId::from_raw(self.id),
            tags,
            author: AuthorView {
                email: self.author_email,
                id: UserId::from_raw(self.author_id),
                username: self.author_username,
                first_name: self.author_first_name,
                last_name: self.author_last_name,
                is_subscribed: self.author_is_subscribed,
            },
            ingredients,
            is_favorited: self.is_favorited,
            is_in_shopping_cart: self.is_in_shopping_cart,
            name: self.name,
            image: self.image,
            text: self.text,
            cooking_time: self.cooking_time,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecipeTagRow {
    recipe_id: i64,
    id: i64,
    name: String,
    color: String,
    slug: String,
}

impl RecipeTagRow {
    fn into_tag(self) -> Tag {
        Tag {
            id: TagId::from_raw(self.id),
            name: self.name,
            color: self.color,
            slug: self.slug,
        }
    }
}

#[derive(sqlx::FromRow)]
struct IngredientLineRow {
    recipe_id: i64,
    id: i64,
    name: String,
    measurement_unit: String,
    amount: i32,
}

impl IngredientLineRow {
    fn into_line(self) -> IngredientLine {
        IngredientLine {
            id: IngredientId::from_raw(self.id),
            name: self.name,
            measurement_unit: self.measurement_unit,
            amount: self.amount,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShortRecipeRow {
    id: i64,
    name: String,
    image: String,
    cooking_time: i32,
}

impl ShortRecipeRow {
    fn into_short(self) -> ShortRecipe {
        ShortRecipe {
            id: RecipeId::from_raw(self.id),
            name: self.name,
            image: self.image,
            cooking_time: self.cooking_time,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShoppingItemRow {
    name: String,
    measurement_unit: String,
    amount: i64,
}

#[cfg(test)]
mod tests {
    use super::like_prefix;

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("sug"), "sug%");
        assert_eq!(like_prefix("50%_off"), "50\\%\\_off%");
    }
}
