//! Read models
//!
//! Projections returned by the API. They carry viewer-dependent flags and
//! are assembled by queries rather than from entities.

use kernel::id::{RecipeId, UserId};
use serde::Serialize;

/// User as seen by a (possibly anonymous) viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user; always false for anonymous viewers
    pub is_subscribed: bool,
}

/// Compact recipe card listed under a followed author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipePreview {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// Followed author with their newest recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserProfile,
    pub recipes: Vec<RecipePreview>,
    pub recipes_count: i64,
}
