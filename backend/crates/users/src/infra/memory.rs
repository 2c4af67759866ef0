//! In-memory repository for handler and use-case tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use kernel::error::app_error::AppResult;
use kernel::id::{RecipeId, UserId};
use kernel::pagination::PageRequest;
use kernel::relation::RelationRepository;
use platform::password::HashedPassword;
use uuid::Uuid;

use crate::domain::entity::{
    credentials::Credentials,
    session::Session,
    user::{NewUser, User},
};
use crate::domain::repository::{
    CredentialRepository, ProfileQuery, SessionRepository, UserRepository,
};
use crate::domain::subscription::{RecipesLimit, Subscription};
use crate::domain::value_object::{email::Email, username::Username};
use crate::domain::view::{RecipePreview, SubscriptionView, UserProfile};
use crate::error::{UserError, UserResult};

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
    credentials: HashMap<UserId, Credentials>,
    sessions: HashMap<Uuid, Session>,
    /// (user, author) in insertion order
    subscriptions: Vec<(UserId, UserId)>,
    /// (author, recipe) in insertion order
    recipes: Vec<(UserId, RecipePreview)>,
}

#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publish a recipe by `author`, for subscription listings
    pub fn add_recipe(&self, author: UserId, name: &str) -> RecipeId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = RecipeId::from_raw(state.next_id);
        state.recipes.push((
            author,
            RecipePreview {
                id,
                name: name.to_string(),
                image: "data:image/png;base64,AA==".to_string(),
                cooking_time: 10,
            },
        ));
        id
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    fn profile(state: &State, viewer: Option<UserId>, user: &User) -> UserProfile {
        UserProfile {
            email: user.email.to_string(),
            id: user.id,
            username: user.username.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            is_subscribed: viewer
                .is_some_and(|viewer| state.subscriptions.contains(&(viewer, user.id))),
        }
    }

    fn subscription(
        state: &State,
        viewer: UserId,
        author: &User,
        limit: Option<u32>,
    ) -> SubscriptionView {
        let mut recipes: Vec<RecipePreview> = state
            .recipes
            .iter()
            .rev()
            .filter(|(a, _)| *a == author.id)
            .map(|(_, r)| r.clone())
            .collect();
        let recipes_count = recipes.len() as i64;
        if let Some(limit) = limit {
            recipes.truncate(limit as usize);
        }

        SubscriptionView {
            author: Self::profile(state, Some(viewer), author),
            recipes,
            recipes_count,
        }
    }
}

fn paged<T>(items: Vec<T>, page: &PageRequest) -> (Vec<T>, i64) {
    let count = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (items, count)
}

impl UserRepository for MemoryUserRepository {
    async fn create_user(&self, user: NewUser, password: &HashedPassword) -> UserResult<User> {
        let mut state = self.lock();
        state.next_id += 1;
        let now = Utc::now();
        let user = User::from_new(UserId::from_raw(state.next_id), user, now);

        state.credentials.insert(
            user.id,
            Credentials {
                user_id: user.id,
                password_hash: password.clone(),
                updated_at: now,
            },
        );
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> UserResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> UserResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.email.as_str() == email.as_str())
            .cloned())
    }

    async fn email_taken(&self, email: &Email, except: Option<UserId>) -> UserResult<bool> {
        Ok(self
            .lock()
            .users
            .iter()
            .any(|u| u.email.as_str() == email.as_str() && Some(u.id) != except))
    }

    async fn username_taken(
        &self,
        username: &Username,
        except: Option<UserId>,
    ) -> UserResult<bool> {
        Ok(self
            .lock()
            .users
            .iter()
            .any(|u| u.username.as_str() == username.as_str() && Some(u.id) != except))
    }

    async fn update_user(&self, user: &User) -> UserResult<()> {
        let mut state = self.lock();
        if let Some(stored) = state.users.iter_mut().find(|u| u.id == user.id) {
            *stored = user.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> UserResult<bool> {
        let mut state = self.lock();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        state.credentials.remove(&id);
        state.sessions.retain(|_, s| s.user_id != id);
        state.subscriptions.retain(|(u, a)| *u != id && *a != id);
        state.recipes.retain(|(a, _)| *a != id);
        Ok(state.users.len() < before)
    }
}

impl CredentialRepository for MemoryUserRepository {
    async fn find_credentials(&self, user_id: UserId) -> UserResult<Option<Credentials>> {
        Ok(self.lock().credentials.get(&user_id).cloned())
    }

    async fn update_credentials(&self, credentials: &Credentials) -> UserResult<()> {
        self.lock()
            .credentials
            .insert(credentials.user_id, credentials.clone());
        Ok(())
    }
}

impl SessionRepository for MemoryUserRepository {
    async fn create_session(&self, session: &Session) -> UserResult<()> {
        self.lock()
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> UserResult<Option<Session>> {
        Ok(self
            .lock()
            .sessions
            .get(&session_id)
            .filter(|s| !s.is_expired())
            .cloned())
    }

    async fn update_session(&self, session: &Session) -> UserResult<()> {
        if let Some(stored) = self.lock().sessions.get_mut(&session.session_id) {
            *stored = session.clone();
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> UserResult<()> {
        self.lock().sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> UserResult<u64> {
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired());
        Ok((before - state.sessions.len()) as u64)
    }
}

impl ProfileQuery for MemoryUserRepository {
    async fn list_profiles(
        &self,
        viewer: Option<UserId>,
        page: &PageRequest,
    ) -> UserResult<(Vec<UserProfile>, i64)> {
        let state = self.lock();
        let profiles = state
            .users
            .iter()
            .map(|u| Self::profile(&state, viewer, u))
            .collect();
        Ok(paged(profiles, page))
    }

    async fn find_profile(
        &self,
        viewer: Option<UserId>,
        id: UserId,
    ) -> UserResult<Option<UserProfile>> {
        let state = self.lock();
        Ok(state
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| Self::profile(&state, viewer, u)))
    }

    async fn list_subscriptions(
        &self,
        user: UserId,
        page: &PageRequest,
        recipes_limit: Option<u32>,
    ) -> UserResult<(Vec<SubscriptionView>, i64)> {
        let state = self.lock();
        let items = state
            .subscriptions
            .iter()
            .rev()
            .filter(|(u, _)| *u == user)
            .filter_map(|(_, author)| state.users.iter().find(|u| u.id == *author))
            .map(|author| Self::subscription(&state, user, author, recipes_limit))
            .collect();
        Ok(paged(items, page))
    }

    async fn find_subscription(
        &self,
        viewer: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> UserResult<Option<SubscriptionView>> {
        let state = self.lock();
        if !state.subscriptions.contains(&(viewer, author)) {
            return Ok(None);
        }
        Ok(state
            .users
            .iter()
            .find(|u| u.id == author)
            .map(|author| Self::subscription(&state, viewer, author, recipes_limit)))
    }
}

impl RelationRepository<Subscription> for MemoryUserRepository {
    async fn target_exists(&self, author: UserId) -> AppResult<bool> {
        Ok(self.lock().users.iter().any(|u| u.id == author))
    }

    async fn relation_exists(&self, user: UserId, author: UserId) -> AppResult<bool> {
        Ok(self.lock().subscriptions.contains(&(user, author)))
    }

    async fn insert_relation(&self, user: UserId, author: UserId) -> AppResult<()> {
        self.lock().subscriptions.push((user, author));
        Ok(())
    }

    async fn remove_relation(&self, user: UserId, author: UserId) -> AppResult<bool> {
        let mut state = self.lock();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|pair| *pair != (user, author));
        Ok(state.subscriptions.len() < before)
    }

    async fn represent(
        &self,
        user: UserId,
        author: UserId,
        params: &RecipesLimit,
    ) -> AppResult<SubscriptionView> {
        self.find_subscription(user, author, params.recipes_limit)
            .await?
            .ok_or_else(|| UserError::NotFound.into())
    }
}
