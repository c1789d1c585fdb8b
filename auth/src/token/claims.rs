use std::fmt;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// The two kinds of principal a token can assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Admin,
    Device,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::Admin => write!(f, "admin"),
            PrincipalKind::Device => write!(f, "device"),
        }
    }
}

/// Claim set carried by every issued token.
///
/// `sub` holds the principal identifier as a string: an admin id in decimal
/// form, or a device UUID. The resolver re-parses it according to
/// `user_type`, so a token claiming one kind with the other kind's
/// identifier shape never resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Principal kind the subject identifier belongs to
    pub user_type: PrincipalKind,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl TokenClaims {
    /// Create claims for a principal, expiring `ttl_hours` from now.
    pub fn new(subject: impl ToString, user_type: PrincipalKind, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(ttl_hours);

        Self {
            sub: subject.to_string(),
            user_type,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        }
    }
}
