//! Client identification utilities
//!
//! Functions for identifying API clients and their credentials from HTTP
//! headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

use crate::crypto::sha256;

/// Client fingerprint derived from request headers
///
/// Sessions remember the fingerprint they were issued to so that a token
/// copied to a different client is rejected.
#[derive(Debug, Clone)]
pub struct ClientFingerprint {
    /// SHA-256 hash of the User-Agent header (empty string when absent)
    pub hash: [u8; 32],
    /// Client IP address (from X-Forwarded-For or direct connection)
    pub ip: Option<IpAddr>,
    /// Original User-Agent string
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    /// Derive the fingerprint of the client that sent `headers`
    ///
    /// API clients without a User-Agent all share the fingerprint of the
    /// empty string.
    pub fn from_headers(headers: &HeaderMap, client_ip: Option<IpAddr>) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let hash = sha256(user_agent.as_deref().unwrap_or_default().as_bytes());

        Self {
            hash,
            ip: client_ip,
            user_agent,
        }
    }

    /// Get IP as string (for database storage)
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For first (for reverse proxy setups), then falls back
/// to the direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}

/// Extract the credential of an `Authorization: <scheme> <credential>` header
///
/// The scheme comparison is case-insensitive. Returns `None` for other
/// schemes or an empty credential.
pub fn extract_authorization<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (given, credential) = value.trim().split_once(' ')?;
    let credential = credential.trim();

    (given.eq_ignore_ascii_case(scheme) && !credential.is_empty()).then_some(credential)
}
