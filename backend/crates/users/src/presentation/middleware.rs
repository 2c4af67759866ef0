//! Session Middleware
//!
//! Resolves the presented session token to a [`CurrentUser`] stored in the
//! request extensions. Requests without a valid token pass through
//! anonymously; handlers decide whether that is acceptable.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use kernel::identity::CurrentUser;
use platform::client::{ClientFingerprint, extract_authorization, extract_client_ip};
use platform::cookie::extract_cookie;

use crate::application::CheckSessionUseCase;
use crate::application::config::UsersConfig;
use crate::domain::repository::SessionRepository;

/// Scheme of the `Authorization` header carrying a session token
pub const TOKEN_SCHEME: &str = "Token";

/// Middleware state
pub struct SessionState<R> {
    pub repo: Arc<R>,
    pub config: Arc<UsersConfig>,
}

impl<R> SessionState<R> {
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for SessionState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Session token from `Authorization: Token <token>`, else from the cookie
pub fn session_token(headers: &HeaderMap, config: &UsersConfig) -> Option<String> {
    extract_authorization(headers, TOKEN_SCHEME)
        .map(str::to_owned)
        .or_else(|| extract_cookie(headers, &config.session_cookie_name))
}

fn client_fingerprint(headers: &HeaderMap, extensions: &Extensions) -> ClientFingerprint {
    let direct_ip = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(headers, direct_ip);

    ClientFingerprint::from_headers(headers, client_ip)
}

/// Fingerprint of the requesting client
pub struct ClientInfo(pub ClientFingerprint);

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientInfo(client_fingerprint(&parts.headers, &parts.extensions)))
    }
}

/// Attach the signed-in caller, if any, to the request
pub async fn authenticate<R>(
    State(state): State<SessionState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: SessionRepository + Send + Sync + 'static,
{
    if let Some(token) = session_token(req.headers(), &state.config) {
        let fingerprint = client_fingerprint(req.headers(), req.extensions());
        let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

        if let Some(user_id) = use_case.current_user(&token, &fingerprint.hash).await {
            req.extensions_mut().insert(CurrentUser(user_id));
        }
    }

    next.run(req).await
}
