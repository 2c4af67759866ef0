//! Sign In Use Case
//!
//! Exchanges email and password for a session token.

use std::sync::Arc;

use kernel::error::fields::FieldErrors;
use kernel::id::UserId;
use platform::client::ClientFingerprint;
use platform::password::Password;

use crate::application::config::UsersConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, session_token::SessionToken};
use crate::error::{UserError, UserResult};

/// Sign in input
#[derive(Debug, Default)]
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Sign in output
pub struct SignInOutput {
    /// Token for the `Authorization: Token` header and the session cookie
    pub session_token: SessionToken,
    pub user_id: UserId,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository + CredentialRepository + SessionRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + CredentialRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        fingerprint: ClientFingerprint,
    ) -> UserResult<SignInOutput> {
        let mut errors = FieldErrors::new();
        let email = errors.require("email", input.email);
        let password = errors.require("password", input.password);
        let (Some(email), Some(password)) = (email, password) else {
            return Err(errors.into());
        };

        let email = Email::new(email).map_err(|_| UserError::InvalidCredentials)?;
        let password = Password::unchecked(password);

        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let credentials = self
            .repo
            .find_credentials(user.id)
            .await?
            .ok_or_else(|| UserError::Internal("Credentials not found".to_string()))?;

        if !credentials.verify(&password, self.config.pepper()) {
            return Err(UserError::InvalidCredentials);
        }

        let session = Session::new(user.id, &fingerprint, self.config.session_ttl_delta());
        self.repo.create_session(&session).await?;

        let session_token = SessionToken::issue(session.session_id, &self.config.session_secret)?;

        tracing::info!(
            user_id = %user.id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user_id: user.id,
        })
    }
}
