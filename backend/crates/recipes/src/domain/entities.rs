//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{IngredientId, RecipeId, TagId, UserId};
use serde::Serialize;

use super::value_objects::{
    CookingTime, IngredientList, RecipeImage, RecipeName, RecipeText, TagSet,
};

/// Recipe category, managed by administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    pub slug: String,
}

/// Reference ingredient with its unit of measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Stored recipe
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: UserId,
    pub name: RecipeName,
    pub text: RecipeText,
    pub image: RecipeImage,
    pub cooking_time: CookingTime,
    pub tags: TagSet,
    pub ingredients: IngredientList,
    pub created_at: DateTime<Utc>,
}

/// Validated recipe before an id is assigned
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: RecipeName,
    pub text: RecipeText,
    pub image: RecipeImage,
    pub cooking_time: CookingTime,
    pub tags: TagSet,
    pub ingredients: IngredientList,
}

/// Validated partial update; `None` leaves the field unchanged
///
/// `tags` and `ingredients` replace the whole set when present.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub name: Option<RecipeName>,
    pub text: Option<RecipeText>,
    pub image: Option<RecipeImage>,
    pub cooking_time: Option<CookingTime>,
    pub tags: Option<TagSet>,
    pub ingredients: Option<IngredientList>,
}

impl RecipeChanges {
    /// Complete draft when every field is present
    pub fn into_draft(self) -> Option<RecipeDraft> {
        Some(RecipeDraft {
            name: self.name?,
            text: self.text?,
            image: self.image?,
            cooking_time: self.cooking_time?,
            tags: self.tags?,
            ingredients: self.ingredients?,
        })
    }
}

impl Recipe {
    pub fn from_draft(id: RecipeId, author: UserId, draft: RecipeDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author,
            name: draft.name,
            text: draft.text,
            image: draft.image,
            cooking_time: draft.cooking_time,
            tags: draft.tags,
            ingredients: draft.ingredients,
            created_at: now,
        }
    }

    /// Apply a partial update
    pub fn apply(&mut self, changes: RecipeChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(text) = changes.text {
            self.text = text;
        }
        if let Some(image) = changes.image {
            self.image = image;
        }
        if let Some(cooking_time) = changes.cooking_time {
            self.cooking_time = cooking_time;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(ingredients) = changes.ingredients {
            self.ingredients = ingredients;
        }
    }
}
