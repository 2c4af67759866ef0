//! Shopping List Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::ShoppingListQuery;
use crate::domain::services::ShoppingList;
use crate::error::RecipeResult;

pub struct ShoppingListUseCase<R>
where
    R: ShoppingListQuery,
{
    repo: Arc<R>,
}

impl<R> ShoppingListUseCase<R>
where
    R: ShoppingListQuery,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Aggregated ingredients of every recipe in `user`'s cart
    pub async fn execute(&self, user: UserId) -> RecipeResult<ShoppingList> {
        let items = self.repo.shopping_items(user).await?;
        let list = ShoppingList::aggregate(items);

        tracing::info!(user_id = %user, items = list.items().len(), "Shopping list exported");

        Ok(list)
    }
}
