//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::UserResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<UsersConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<UsersConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Sign out from the session behind `session_token`
    pub async fn execute(&self, session_token: &str) -> UserResult<()> {
        let session_id = SessionToken::verify(session_token, &self.config.session_secret)?;
        self.session_repo.delete_session(session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(())
    }
}
