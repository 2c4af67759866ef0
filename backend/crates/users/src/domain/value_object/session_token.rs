//! Session Token
//!
//! `<session-uuid>.<base64url HMAC-SHA256(session-uuid)>`. The signature
//! lets forged or truncated tokens be rejected without a database lookup.

use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Signed reference to a server-side session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Sign `session_id` with `secret`
    pub fn issue(session_id: Uuid, secret: &[u8]) -> UserResult<Self> {
        let id = session_id.to_string();
        let signature = hmac_sha256(secret, id.as_bytes())
            .map_err(|e| UserError::Internal(format!("Session signing failed: {e}")))?;

        Ok(Self(format!("{id}.{}", to_base64_url(&signature))))
    }

    /// Verify the signature and return the session id
    pub fn verify(token: &str, secret: &[u8]) -> UserResult<Uuid> {
        let (id, signature_b64) = token.split_once('.').ok_or(UserError::SessionInvalid)?;

        let signature = from_base64_url(signature_b64).map_err(|_| UserError::SessionInvalid)?;
        if !verify_hmac_sha256(secret, id.as_bytes(), &signature) {
            return Err(UserError::SessionInvalid);
        }

        id.parse().map_err(|_| UserError::SessionInvalid)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [9u8; 32];

    #[test]
    fn test_issue_and_verify() {
        let id = Uuid::new_v4();
        let token = SessionToken::issue(id, &SECRET).unwrap();

        assert!(token.as_str().starts_with(&id.to_string()));
        assert_eq!(SessionToken::verify(token.as_str(), &SECRET).unwrap(), id);
    }

    #[test]
    fn test_rejects_tampering() {
        let token = SessionToken::issue(Uuid::new_v4(), &SECRET).unwrap();
        let (_, signature) = token.as_str().split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), signature);

        assert!(matches!(
            SessionToken::verify(&forged, &SECRET),
            Err(UserError::SessionInvalid)
        ));
        assert!(SessionToken::verify(token.as_str(), &[1u8; 32]).is_err());
        assert!(SessionToken::verify("no-dot-here", &SECRET).is_err());
        assert!(SessionToken::verify("abc.!!!", &SECRET).is_err());
    }
}
