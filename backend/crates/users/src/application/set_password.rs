//! Set Password Use Case
//!
//! Replaces the caller's password after checking the current one.

use std::sync::Arc;

use kernel::error::fields::FieldErrors;
use kernel::id::UserId;
use platform::password::Password;

use crate::application::config::UsersConfig;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::error::{UserError, UserResult};

#[derive(Debug, Default)]
pub struct SetPasswordInput {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct SetPasswordUseCase<R>
where
    R: UserRepository + CredentialRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> SetPasswordUseCase<R>
where
    R: UserRepository + CredentialRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, user_id: UserId, input: SetPasswordInput) -> UserResult<()> {
        let mut errors = FieldErrors::new();
        let current = errors.require("current_password", input.current_password);
        let new = errors.require("new_password", input.new_password);
        let (Some(current), Some(new)) = (current, new) else {
            return Err(errors.into());
        };

        let user = self
            .repo
            .find_user(user_id)
            .await?
            .ok_or(UserError::NotFound)?;
        let mut credentials = self
            .repo
            .find_credentials(user_id)
            .await?
            .ok_or_else(|| UserError::Internal("Credentials not found".to_string()))?;

        if !credentials.verify(&Password::unchecked(current), self.config.pepper()) {
            tracing::warn!(user_id = %user_id, "Password change with wrong current password");
            return Err(UserError::WrongPassword);
        }

        let new = Password::new(new)
            .and_then(|password| {
                password.check_similarity(&[
                    ("username", user.username.as_str()),
                    ("email address", user.email.as_str()),
                ])?;
                Ok(password)
            })
            .map_err(|e| UserError::from(FieldErrors::new().with("new_password", e.to_string())))?;

        credentials.set_password(new.hash(self.config.pepper())?);
        self.repo.update_credentials(&credentials).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
