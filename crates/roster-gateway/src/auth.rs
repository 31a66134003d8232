//! Admin sessions.
//!
//! Unlocking admin mode checks the password against the auth webhook and
//! hands back an opaque bearer token. Tokens live in memory only, so a
//! restart logs every admin out.

use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;
use roster_core::RosterError;
use tracing::debug;

pub struct AdminSessions {
    tokens: DashMap<String, Instant>,
    ttl: Duration,
}

impl AdminSessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl,
        }
    }

    /// Mint a fresh token valid for the configured lifetime.
    pub fn issue(&self) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), Instant::now() + self.ttl);
        self.prune();
        token
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let expired = match self.tokens.get(token) {
            Some(expires) => *expires <= Instant::now(),
            None => return false,
        };
        if expired {
            self.tokens.remove(token);
            debug!("admin session expired");
        }
        !expired
    }

    /// Returns whether the token was active.
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn prune(&self) {
        let now = Instant::now();
        self.tokens.retain(|_, expires| *expires > now);
    }
}

pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Fail with `AdminRequired` unless the request carries a live token.
pub fn require_admin(sessions: &AdminSessions, headers: &HeaderMap) -> Result<(), RosterError> {
    match extract_bearer(headers) {
        Some(token) if sessions.is_valid(token) => Ok(()),
        _ => Err(RosterError::AdminRequired),
    }
}
