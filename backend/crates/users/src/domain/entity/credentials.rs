//! Credentials Entity
//!
//! Password hash of an account, kept apart from the profile so that profile
//! reads never load it.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::{HashedPassword, Password};

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub password_hash: HashedPassword,
    pub updated_at: DateTime<Utc>,
}

impl Credentials {
    pub fn verify(&self, password: &Password, pepper: Option<&[u8]>) -> bool {
        self.password_hash.verify(password, pepper)
    }

    /// Replace the stored hash
    pub fn set_password(&mut self, hash: HashedPassword) {
        self.password_hash = hash;
        self.updated_at = Utc::now();
    }
}
