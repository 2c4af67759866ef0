//! API DTOs (Data Transfer Objects)

use kernel::id::UserId;
use kernel::pagination::PageQuery;
use serde::Deserialize;

use crate::application::{IngredientInput, RecipeInput};

/// `ingredients` entry of a recipe body
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct IngredientRequest {
    pub id: Option<i64>,
    pub amount: Option<i64>,
}

/// Body of `POST /recipes` and `PATCH /recipes/{id}`
///
/// Every field is optional here; the use case reports missing ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientRequest>>,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(req: RecipeRequest) -> Self {
        Self {
            name: req.name,
            text: req.text,
            image: req.image,
            cooking_time: req.cooking_time,
            tags: req.tags,
            ingredients: req.ingredients.map(|lines| {
                lines
                    .into_iter()
                    .map(|line| IngredientInput {
                        id: line.id,
                        amount: line.amount,
                    })
                    .collect()
            }),
        }
    }
}

/// `GET /recipes` query string; `tags` may repeat
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<i64>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

impl RecipeListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn author(&self) -> Option<UserId> {
        self.author.map(UserId::from_raw)
    }

    pub fn is_favorited(&self) -> bool {
        flag(self.is_favorited.as_deref())
    }

    pub fn is_in_shopping_cart(&self) -> bool {
        flag(self.is_in_shopping_cart.as_deref())
    }
}

/// `1` and `true` switch a filter on; anything else leaves it off
fn flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1") | Some("true") | Some("True"))
}

/// `GET /ingredients` query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSearch {
    pub name: Option<String>,
}
