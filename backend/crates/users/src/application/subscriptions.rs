//! List Subscriptions Use Case

use std::sync::Arc;

use kernel::id::UserId;
use kernel::pagination::{Page, PageQuery};

use crate::application::config::UsersConfig;
use crate::application::profile::ListLocation;
use crate::domain::repository::ProfileQuery;
use crate::domain::view::SubscriptionView;
use crate::error::UserResult;

pub struct ListSubscriptionsUseCase<R>
where
    R: ProfileQuery,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> ListSubscriptionsUseCase<R>
where
    R: ProfileQuery,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    /// Authors followed by `user`, most recently followed first
    pub async fn execute(
        &self,
        user: UserId,
        query: PageQuery,
        recipes_limit: Option<u32>,
        location: ListLocation<'_>,
    ) -> UserResult<Page<SubscriptionView>> {
        let page = query.resolve(self.config.page_size, self.config.max_page_size)?;
        let (items, count) = self
            .repo
            .list_subscriptions(user, &page, recipes_limit)
            .await?;
        Ok(Page::new(items, count, &page, location.path, location.query)?)
    }
}
