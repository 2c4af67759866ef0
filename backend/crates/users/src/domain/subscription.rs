//! Subscription relation
//!
//! A user following an author. Plugs into the shared create/destroy flow
//! from [`kernel::relation`].

use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;
use kernel::relation::RelationKind;
use serde::Deserialize;

use crate::domain::view::SubscriptionView;

/// `?recipes_limit=N` on subscription endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecipesLimit {
    pub recipes_limit: Option<u32>,
}

pub struct Subscription;

impl RelationKind for Subscription {
    type Target = UserId;
    type Output = SubscriptionView;
    type Params = RecipesLimit;

    const NAME: &'static str = "subscribe";
    const TARGET_LABEL: &'static str = "User";
    const DUPLICATE_MESSAGE: &'static str = "You are already subscribed to this author.";

    fn validate(user: UserId, author: UserId) -> AppResult<()> {
        if user == author {
            return Err(AppError::validation(
                Self::NAME,
                "You cannot subscribe to yourself.",
            ));
        }
        Ok(())
    }
}
