//! Application Configuration
//!
//! Configuration for the Users application layer.

use std::time::Duration;

use platform::cookie::CookieSpec;
/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Users application configuration
#[derive(Debug, Clone)]
pub struct UsersConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime, extended while the client stays active
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Page size when `limit` is absent
    pub page_size: u32,
    /// Upper bound for `limit`
    pub max_page_size: u32,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "foodgram_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(14 * 24 * 3600), // 2 weeks
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            page_size: 6,
            max_page_size: 100,
        }
    }
}

impl UsersConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Session TTL as a chrono duration
    pub fn session_ttl_delta(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::days(14))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Attributes of the session cookie
    pub fn session_cookie(&self) -> CookieSpec {
        CookieSpec {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }
}
