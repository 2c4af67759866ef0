//! Register Use Case
//!
//! Creates an account from the sign-up form.

use std::sync::Arc;

use kernel::error::fields::FieldErrors;
use platform::password::Password;

use crate::application::config::UsersConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, person_name::PersonName, username::Username};
use crate::error::UserResult;

/// Register input; every field is required
#[derive(Debug, Default)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> UserResult<User> {
        let mut errors = FieldErrors::new();

        let email = errors
            .require("email", input.email)
            .and_then(|raw| errors.check("email", Email::new(raw)));
        let username = errors
            .require("username", input.username)
            .and_then(|raw| errors.check("username", Username::new(raw)));
        let first_name = errors
            .require("first_name", input.first_name)
            .and_then(|raw| errors.check("first_name", PersonName::new(raw)));
        let last_name = errors
            .require("last_name", input.last_name)
            .and_then(|raw| errors.check("last_name", PersonName::new(raw)));
        let password = errors.require("password", input.password).and_then(|raw| {
            Password::new(raw)
                .map_err(|e| errors.add("password", e.to_string()))
                .ok()
        });

        if let Some(email) = &email {
            if self.repo.email_taken(email, None).await? {
                errors.add("email", "A user with that email already exists.");
            }
        }
        if let Some(username) = &username {
            if self.repo.username_taken(username, None).await? {
                errors.add("username", "A user with that username already exists.");
            }
        }

        if let (Some(password), Some(email), Some(username)) = (&password, &email, &username) {
            if let Err(e) = password.check_similarity(&[
                ("username", username.as_str()),
                ("email address", email.as_str()),
            ]) {
                errors.add("password", e.to_string());
            }
        }

        let (Some(email), Some(username), Some(first_name), Some(last_name), Some(password)) =
            (email, username, first_name, last_name, password)
        else {
            return Err(errors.into());
        };
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let hash = password.hash(self.config.pepper())?;

        let user = self
            .repo
            .create_user(
                NewUser {
                    email,
                    username,
                    first_name,
                    last_name,
                },
                &hash,
            )
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }
}
