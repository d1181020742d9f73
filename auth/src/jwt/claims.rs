use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims.
///
/// Carries the RFC 7519 registered claims a session needs (`sub`, `iss`,
/// `iat`, `exp`) plus the caller's role. Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity reference)
    pub sub: String,

    /// Role granted to the subject
    pub role: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for a session starting at `now`.
    ///
    /// # Arguments
    /// * `subject` - Identity reference
    /// * `role` - Role name
    /// * `issuer` - Token issuer name
    /// * `now` - Issue instant (Unix timestamp)
    /// * `ttl` - Lifetime of the session
    ///
    /// # Returns
    /// Claims with `exp = now + ttl`
    pub fn for_session(
        subject: impl ToString,
        role: impl ToString,
        issuer: impl ToString,
        now: i64,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            role: role.to_string(),
            iss: issuer.to_string(),
            iat: now,
            exp: now.saturating_add(ttl.num_seconds()),
        }
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at its expiry instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
