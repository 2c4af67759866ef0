//! Profile Use Cases
//!
//! Listing, reading, partially updating and deleting accounts.

use std::sync::Arc;

use kernel::error::fields::FieldErrors;
use kernel::id::UserId;
use kernel::pagination::{Page, PageQuery};
use kernel::permission::require_authenticated;

use crate::application::config::UsersConfig;
use crate::domain::entity::user::UserChanges;
use crate::domain::repository::{ProfileQuery, UserRepository};
use crate::domain::value_object::{email::Email, person_name::PersonName, username::Username};
use crate::domain::view::UserProfile;
use crate::error::{UserError, UserResult};

/// Fields accepted by a partial update; absent fields stay unchanged
#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Where the list was requested, for `next`/`previous` links
pub struct ListLocation<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

pub struct ProfileUseCase<R>
where
    R: UserRepository + ProfileQuery,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> ProfileUseCase<R>
where
    R: UserRepository + ProfileQuery,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn list(
        &self,
        viewer: Option<UserId>,
        query: PageQuery,
        location: ListLocation<'_>,
    ) -> UserResult<Page<UserProfile>> {
        let page = query.resolve(self.config.page_size, self.config.max_page_size)?;
        let (profiles, count) = self.repo.list_profiles(viewer, &page).await?;
        Ok(Page::new(profiles, count, &page, location.path, location.query)?)
    }

    pub async fn get(&self, viewer: Option<UserId>, id: UserId) -> UserResult<UserProfile> {
        self.repo
            .find_profile(viewer, id)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Profile of the caller
    pub async fn me(&self, caller: Option<UserId>) -> UserResult<UserProfile> {
        let caller = require_authenticated(caller)?;
        self.get(Some(caller), caller).await
    }

    /// Partial update; only the account owner may change it
    pub async fn update(
        &self,
        caller: Option<UserId>,
        id: UserId,
        input: UpdateProfileInput,
    ) -> UserResult<UserProfile> {
        let caller = require_authenticated(caller)?;
        let mut user = self.repo.find_user(id).await?.ok_or(UserError::NotFound)?;
        if caller != user.id {
            return Err(UserError::Forbidden);
        }

        let mut errors = FieldErrors::new();
        let changes = UserChanges {
            email: input
                .email
                .and_then(|raw| errors.check("email", Email::new(raw))),
            username: input
                .username
                .and_then(|raw| errors.check("username", Username::new(raw))),
            first_name: input
                .first_name
                .and_then(|raw| errors.check("first_name", PersonName::new(raw))),
            last_name: input
                .last_name
                .and_then(|raw| errors.check("last_name", PersonName::new(raw))),
        };

        if let Some(email) = &changes.email {
            if self.repo.email_taken(email, Some(id)).await? {
                errors.add("email", "A user with that email already exists.");
            }
        }
        if let Some(username) = &changes.username {
            if self.repo.username_taken(username, Some(id)).await? {
                errors.add("username", "A user with that username already exists.");
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        user.apply(changes);
        self.repo.update_user(&user).await?;

        tracing::info!(user_id = %id, "User profile updated");

        self.get(Some(caller), id).await
    }

    /// Delete an account; only the owner may delete it
    pub async fn delete(&self, caller: Option<UserId>, id: UserId) -> UserResult<()> {
        let caller = require_authenticated(caller)?;
        if self.repo.find_user(id).await?.is_none() {
            return Err(UserError::NotFound);
        }
        if caller != id {
            return Err(UserError::Forbidden);
        }

        self.repo.delete_user(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
