//! User-owned relations
//!
//! Favorites, shopping-cart entries and subscriptions all follow the same
//! shape: a signed-in user adds or removes a link to some target. The target
//! must exist, the link must not exist yet on create, and must exist on
//! destroy. [`RelationKind`] describes one such link and
//! [`RelationUseCase`] runs the shared flow against a
//! [`RelationRepository`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::app_error::{AppError, AppResult};
use crate::id::UserId;

/// Describes one kind of user-to-target link
pub trait RelationKind: Send + Sync + 'static {
    /// Key of the linked entity
    type Target: Copy + fmt::Display + From<i64> + Send + Sync + 'static;
    /// Body returned after a successful create
    type Output: Serialize + Send + 'static;
    /// Extra query parameters accepted on create
    type Params: DeserializeOwned + Default + Send + Sync + 'static;

    /// Short name used in logs and as the field key of duplicate errors
    const NAME: &'static str;
    /// Used in the 404 message when the target is missing
    const TARGET_LABEL: &'static str;
    /// Field error returned with 400 when the link already exists
    const DUPLICATE_MESSAGE: &'static str;

    /// Kind-specific checks run after the target was found
    fn validate(_user: UserId, _target: Self::Target) -> AppResult<()> {
        Ok(())
    }
}

/// Query parameters for kinds that take none
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct NoParams {}

/// Storage for one relation kind
#[trait_variant::make(RelationRepository: Send)]
pub trait LocalRelationRepository<K: RelationKind> {
    async fn target_exists(&self, target: K::Target) -> AppResult<bool>;

    async fn relation_exists(&self, user: UserId, target: K::Target) -> AppResult<bool>;

    async fn insert_relation(&self, user: UserId, target: K::Target) -> AppResult<()>;

    /// Returns whether a link was removed
    async fn remove_relation(&self, user: UserId, target: K::Target) -> AppResult<bool>;

    /// Build the create response for `target` as seen by `user`
    async fn represent(
        &self,
        user: UserId,
        target: K::Target,
        params: &K::Params,
    ) -> AppResult<K::Output>;
}

/// Create/destroy flow shared by every relation kind
pub struct RelationUseCase<K, R> {
    repo: Arc<R>,
    _kind: PhantomData<fn() -> K>,
}

impl<K, R> RelationUseCase<K, R>
where
    K: RelationKind,
    R: RelationRepository<K> + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            _kind: PhantomData,
        }
    }

    pub async fn create(
        &self,
        user: UserId,
        target: K::Target,
        params: &K::Params,
    ) -> AppResult<K::Output> {
        if !self.repo.target_exists(target).await? {
            return Err(AppError::not_found(format!(
                "{} not found",
                K::TARGET_LABEL
            )));
        }

        K::validate(user, target)?;

        if self.repo.relation_exists(user, target).await? {
            return Err(AppError::validation(K::NAME, K::DUPLICATE_MESSAGE));
        }

        self.repo.insert_relation(user, target).await?;

        tracing::info!(
            relation = K::NAME,
            user_id = %user,
            target_id = %target,
            "Relation created"
        );

        self.repo.represent(user, target, params).await
    }

    pub async fn destroy(&self, user: UserId, target: K::Target) -> AppResult<()> {
        if !self.repo.target_exists(target).await? {
            return Err(AppError::not_found(format!(
                "{} not found",
                K::TARGET_LABEL
            )));
        }

        if !self.repo.remove_relation(user, target).await? {
            return Err(AppError::not_found(format!(
                "{} is not in your {}",
                K::TARGET_LABEL,
                K::NAME
            )));
        }

        tracing::info!(
            relation = K::NAME,
            user_id = %user,
            target_id = %target,
            "Relation removed"
        );

        Ok(())
    }
}

#[cfg(feature = "axum")]
pub use self::http::{create, destroy, routes};

#[cfg(feature = "axum")]
mod http {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::{RelationKind, RelationRepository, RelationUseCase};
    use crate::error::app_error::AppResult;
    use crate::extract::{PathParam, Query, QueryParams, WithRejection};
    use crate::identity::CurrentUser;

    /// POST handler: link the caller to `{id}`
    pub async fn create<K, R>(
        State(repo): State<Arc<R>>,
        CurrentUser(user): CurrentUser,
        WithRejection(Path(id), _): PathParam<i64>,
        WithRejection(Query(params), _): QueryParams<K::Params>,
    ) -> AppResult<(StatusCode, Json<K::Output>)>
    where
        K: RelationKind,
        R: RelationRepository<K> + Send + Sync + 'static,
    {
        let output = RelationUseCase::<K, R>::new(repo)
            .create(user, K::Target::from(id), &params)
            .await?;
        Ok((StatusCode::CREATED, Json(output)))
    }

    /// DELETE handler: unlink the caller from `{id}`
    pub async fn destroy<K, R>(
        State(repo): State<Arc<R>>,
        CurrentUser(user): CurrentUser,
        WithRejection(Path(id), _): PathParam<i64>,
    ) -> AppResult<StatusCode>
    where
        K: RelationKind,
        R: RelationRepository<K> + Send + Sync + 'static,
    {
        RelationUseCase::<K, R>::new(repo)
            .destroy(user, K::Target::from(id))
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// Router serving POST and DELETE on `path`
    pub fn routes<K, R>(path: &str, repo: Arc<R>) -> Router
    where
        K: RelationKind,
        R: RelationRepository<K> + Send + Sync + 'static,
    {
        Router::new()
            .route(path, post(create::<K, R>).delete(destroy::<K, R>))
            .with_state(repo)
    }
}
