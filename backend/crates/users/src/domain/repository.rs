//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use kernel::pagination::PageRequest;
use platform::password::HashedPassword;
use uuid::Uuid;

use crate::domain::entity::{
    credentials::Credentials,
    session::Session,
    user::{NewUser, User},
};
use crate::domain::value_object::{email::Email, username::Username};
use crate::domain::view::{SubscriptionView, UserProfile};
use crate::error::UserResult;

/// User account storage
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert the user together with its credentials
    async fn create_user(&self, user: NewUser, password: &HashedPassword) -> UserResult<User>;

    async fn find_user(&self, id: UserId) -> UserResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> UserResult<Option<User>>;

    /// Whether another account (other than `except`) uses `email`
    async fn email_taken(&self, email: &Email, except: Option<UserId>) -> UserResult<bool>;

    /// Whether another account (other than `except`) uses `username`
    async fn username_taken(&self, username: &Username, except: Option<UserId>)
    -> UserResult<bool>;

    async fn update_user(&self, user: &User) -> UserResult<()>;

    /// Delete the account; sessions, subscriptions and recipes cascade
    async fn delete_user(&self, id: UserId) -> UserResult<bool>;
}

/// Password hash storage
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    async fn find_credentials(&self, user_id: UserId) -> UserResult<Option<Credentials>>;

    async fn update_credentials(&self, credentials: &Credentials) -> UserResult<()>;
}

/// Login session storage
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create_session(&self, session: &Session) -> UserResult<()>;

    /// Find an unexpired session
    async fn find_session(&self, session_id: Uuid) -> UserResult<Option<Session>>;

    /// Persist activity and expiry
    async fn update_session(&self, session: &Session) -> UserResult<()>;

    async fn delete_session(&self, session_id: Uuid) -> UserResult<()>;

    /// Remove expired sessions
    async fn cleanup_expired(&self) -> UserResult<u64>;
}

/// Viewer-dependent profile queries
#[trait_variant::make(ProfileQuery: Send)]
pub trait LocalProfileQuery {
    /// One page of users ordered by id, with the total count
    async fn list_profiles(
        &self,
        viewer: Option<UserId>,
        page: &PageRequest,
    ) -> UserResult<(Vec<UserProfile>, i64)>;

    async fn find_profile(
        &self,
        viewer: Option<UserId>,
        id: UserId,
    ) -> UserResult<Option<UserProfile>>;

    /// One page of authors followed by `user`, with the total count
    async fn list_subscriptions(
        &self,
        user: UserId,
        page: &PageRequest,
        recipes_limit: Option<u32>,
    ) -> UserResult<(Vec<SubscriptionView>, i64)>;

    /// `author` as listed in `viewer`'s subscriptions
    async fn find_subscription(
        &self,
        viewer: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> UserResult<Option<SubscriptionView>>;
}
