//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::extract::{JsonBody, PathParam, Query, QueryParams, WithRejection};
use kernel::id::UserId;
use kernel::identity::{CurrentUser, MaybeUser};
use kernel::pagination::{Page, PageQuery};
use kernel::relation::RelationRepository;

use crate::application::config::UsersConfig;
use crate::application::{
    ListLocation, ListSubscriptionsUseCase, ProfileUseCase, RegisterUseCase, SetPasswordUseCase,
    SignInUseCase, SignOutUseCase,
};
use crate::domain::repository::{
    CredentialRepository, ProfileQuery, SessionRepository, UserRepository,
};
use crate::domain::subscription::Subscription;
use crate::domain::view::{SubscriptionView, UserProfile};
use crate::error::{UserError, UserResult};
use crate::presentation::dto::{
    LoginRequest, RegisterRequest, RegisterResponse, SetPasswordRequest, SubscriptionsQuery,
    TokenResponse, UpdateUserRequest,
};
use crate::presentation::middleware::{ClientInfo, session_token};

/// Every storage capability the users endpoints need
pub trait UsersBackend:
    UserRepository
    + CredentialRepository
    + SessionRepository
    + ProfileQuery
    + RelationRepository<Subscription>
    + Send
    + Sync
    + 'static
{
}

impl<T> UsersBackend for T where
    T: UserRepository
        + CredentialRepository
        + SessionRepository
        + ProfileQuery
        + RelationRepository<Subscription>
        + Send
        + Sync
        + 'static
{
}

/// Shared state for users handlers
pub struct UsersAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<UsersConfig>,
}

impl<R> Clone for UsersAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> UsersAppState<R> {
    fn profiles(&self) -> ProfileUseCase<R>
    where
        R: UserRepository + ProfileQuery,
    {
        ProfileUseCase::new(self.repo.clone(), self.config.clone())
    }
}

fn location(uri: &OriginalUri) -> ListLocation<'_> {
    ListLocation {
        path: uri.path(),
        query: uri.query(),
    }
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/users
pub async fn list_users<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    viewer: MaybeUser,
    uri: OriginalUri,
    WithRejection(Query(query), _): QueryParams<PageQuery>,
) -> UserResult<Json<Page<UserProfile>>> {
    let page = state
        .profiles()
        .list(viewer.id(), query, location(&uri))
        .await?;
    Ok(Json(page))
}

/// POST /api/users
pub async fn register<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    WithRejection(Json(req), _): JsonBody<RegisterRequest>,
) -> UserResult<(StatusCode, Json<RegisterResponse>)> {
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.execute(req.into()).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users/{id}
pub async fn get_user<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    viewer: MaybeUser,
    WithRejection(Path(id), _): PathParam<i64>,
) -> UserResult<Json<UserProfile>> {
    let profile = state
        .profiles()
        .get(viewer.id(), UserId::from_raw(id))
        .await?;
    Ok(Json(profile))
}

/// PUT /api/users/{id}
pub async fn replace_user() -> UserError {
    UserError::FullUpdateNotAllowed
}

/// PATCH /api/users/{id}
pub async fn update_user<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    caller: MaybeUser,
    WithRejection(Path(id), _): PathParam<i64>,
    WithRejection(Json(req), _): JsonBody<UpdateUserRequest>,
) -> UserResult<Json<UserProfile>> {
    let profile = state
        .profiles()
        .update(caller.id(), UserId::from_raw(id), req.into())
        .await?;
    Ok(Json(profile))
}

/// DELETE /api/users/{id}
pub async fn delete_user<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    caller: MaybeUser,
    WithRejection(Path(id), _): PathParam<i64>,
) -> UserResult<StatusCode> {
    state
        .profiles()
        .delete(caller.id(), UserId::from_raw(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/me
pub async fn me<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    caller: MaybeUser,
) -> UserResult<Json<UserProfile>> {
    Ok(Json(state.profiles().me(caller.id()).await?))
}

/// POST /api/users/set_password
pub async fn set_password<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(req), _): JsonBody<SetPasswordRequest>,
) -> UserResult<StatusCode> {
    let use_case = SetPasswordUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(user, req.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Subscriptions
// ============================================================================

/// GET /api/subscriptions
pub async fn list_subscriptions<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    CurrentUser(user): CurrentUser,
    uri: OriginalUri,
    WithRejection(Query(query), _): QueryParams<SubscriptionsQuery>,
) -> UserResult<Json<Page<SubscriptionView>>> {
    let use_case = ListSubscriptionsUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case
        .execute(user, query.page_query(), query.recipes_limit, location(&uri))
        .await?;
    Ok(Json(page))
}

// ============================================================================
// Token login / logout
// ============================================================================

/// POST /api/auth/token/login
pub async fn login<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    ClientInfo(fingerprint): ClientInfo,
    WithRejection(Json(req), _): JsonBody<LoginRequest>,
) -> UserResult<impl IntoResponse> {
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(req.into(), fingerprint).await?;

    let cookie = state
        .config
        .session_cookie()
        .header(output.session_token.as_str())
        .map_err(|e| UserError::Internal(format!("Invalid session cookie: {e}")))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(TokenResponse {
            auth_token: output.session_token.into_string(),
        }),
    ))
}

/// POST /api/auth/token/logout
pub async fn logout<R: UsersBackend>(
    State(state): State<UsersAppState<R>>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
) -> UserResult<impl IntoResponse> {
    if let Some(token) = session_token(&headers, &state.config) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        use_case.execute(&token).await?;
    }

    let cookie = state
        .config
        .session_cookie()
        .removal_header()
        .map_err(|e| UserError::Internal(format!("Invalid session cookie: {e}")))?;

    tracing::debug!(user_id = %user, "Session cookie cleared");

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}
