//! Session Entity
//!
//! Server-side login session referenced by a signed token. Bound to the
//! fingerprint of the client it was issued to.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::client::ClientFingerprint;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    pub user_id: UserId,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// SHA-256 of the User-Agent at login
    pub client_fingerprint_hash: Vec<u8>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for `user_id`; TTL comes from configuration
    pub fn new(user_id: UserId, fingerprint: &ClientFingerprint, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            expires_at_ms: (now + ttl).timestamp_millis(),
            client_fingerprint_hash: fingerprint.hash.to_vec(),
            client_ip: fingerprint.ip_string(),
            user_agent: fingerprint.user_agent.clone(),
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    pub fn matches(&self, fingerprint_hash: &[u8]) -> bool {
        self.client_fingerprint_hash == fingerprint_hash
    }

    /// Record activity and slide the expiry
    ///
    /// The expiry moves to `now + ttl` once less than half of `ttl` remains,
    /// so an active client stays signed in without a write on every request.
    /// Returns whether anything worth persisting changed.
    pub fn touch(&mut self, ttl: Duration) -> bool {
        let now = Utc::now();
        let idle = now - self.last_activity_at;
        self.last_activity_at = now;

        if self.expires_at_ms < (now + ttl / 2).timestamp_millis() {
            self.expires_at_ms = (now + ttl).timestamp_millis();
            return true;
        }

        idle > Duration::minutes(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    fn fingerprint() -> ClientFingerprint {
        ClientFingerprint::from_headers(&HeaderMap::new(), None)
    }

    #[test]
    fn test_new_session_not_expired() {
        let session = Session::new(UserId::from_raw(1), &fingerprint(), Duration::hours(1));
        assert!(!session.is_expired());
        assert!(session.matches(&fingerprint().hash));
        assert!(!session.matches(&[0u8; 32]));
    }

    #[test]
    fn test_touch_slides_expiry() {
        let ttl = Duration::hours(10);
        let mut session = Session::new(UserId::from_raw(1), &fingerprint(), ttl);

        // Fresh session: more than half remains, nothing to extend
        let before = session.expires_at_ms;
        assert!(!session.touch(ttl));
        assert_eq!(session.expires_at_ms, before);

        // Only 1 hour left: extended to a full TTL
        session.expires_at_ms = (Utc::now() + Duration::hours(1)).timestamp_millis();
        assert!(session.touch(ttl));
        assert!(session.expires_at_ms > (Utc::now() + Duration::hours(9)).timestamp_millis());
    }

    #[test]
    fn test_expired_session() {
        let mut session = Session::new(UserId::from_raw(1), &fingerprint(), Duration::hours(1));
        session.expires_at_ms = Utc::now().timestamp_millis() - 1;
        assert!(session.is_expired());
    }
}
