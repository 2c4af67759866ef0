//! Check Session Use Case
//!
//! Resolves a presented token to the signed-in user.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::UsersConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::{UserError, UserResult};

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<UsersConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<UsersConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Signed-in user, or `None` for any invalid token
    pub async fn current_user(&self, session_token: &str, fingerprint_hash: &[u8]) -> Option<UserId> {
        match self.get_session(session_token, fingerprint_hash).await {
            Ok(session) => Some(session.user_id),
            Err(UserError::SessionInvalid) => None,
            Err(e) => {
                if e.kind().is_server_error() {
                    tracing::error!(error = %e, "Session lookup failed");
                } else {
                    tracing::debug!(error = %e, "Session rejected");
                }
                None
            }
        }
    }

    /// Get session and update last activity
    pub async fn get_session(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> UserResult<Session> {
        let session_id = SessionToken::verify(session_token, &self.config.session_secret)?;

        let mut session = self
            .session_repo
            .find_session(session_id)
            .await?
            .ok_or(UserError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete_session(session_id).await?;
            return Err(UserError::SessionInvalid);
        }

        if !session.matches(fingerprint_hash) {
            tracing::warn!(
                session_id = %session_id,
                user_id = %session.user_id,
                "Session fingerprint mismatch"
            );
            return Err(UserError::SessionFingerprintMismatch);
        }

        if session.touch(self.config.session_ttl_delta()) {
            // Persist in background
            let repo = self.session_repo.clone();
            let updated = session.clone();
            tokio::spawn(async move {
                if let Err(e) = repo.update_session(&updated).await {
                    tracing::warn!(error = %e, "Failed to update session activity");
                }
            });
        }

        Ok(session)
    }
}
