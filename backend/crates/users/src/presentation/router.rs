//! Users Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use kernel::relation;

use crate::application::config::UsersConfig;
use crate::domain::subscription::Subscription;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, UsersAppState, UsersBackend};

/// Create the users router with PostgreSQL repository
pub fn users_router(repo: Arc<PgUserRepository>, config: Arc<UsersConfig>) -> Router {
    users_router_generic(repo, config)
}

/// Create a users router for any repository implementation
pub fn users_router_generic<R>(repo: Arc<R>, config: Arc<UsersConfig>) -> Router
where
    R: UsersBackend,
{
    let state = UsersAppState {
        repo: repo.clone(),
        config,
    };

    Router::new()
        .route(
            "/users",
            get(handlers::list_users::<R>).post(handlers::register::<R>),
        )
        .route("/users/me", get(handlers::me::<R>))
        .route("/users/set_password", post(handlers::set_password::<R>))
        .route(
            "/users/{id}",
            get(handlers::get_user::<R>)
                .put(handlers::replace_user)
                .patch(handlers::update_user::<R>)
                .delete(handlers::delete_user::<R>),
        )
        .route("/subscriptions", get(handlers::list_subscriptions::<R>))
        .route("/auth/token/login", post(handlers::login::<R>))
        .route("/auth/token/logout", post(handlers::logout::<R>))
        .with_state(state)
        .merge(relation::routes::<Subscription, R>(
            "/users/{id}/subscribe",
            repo,
        ))
}
