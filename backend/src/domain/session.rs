//! Server-side login sessions.
//!
//! A session row maps a random token to a user. Only the token is placed in
//! the client cookie, so revoking the row is enough to end the session even if
//! the client replays an old cookie. Rows older than [`SESSION_TTL_SECS`]
//! resolve to nobody, matching the lifetime of the session cookie.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of a server-side session and of the cookie carrying its token.
pub const SESSION_TTL_SECS: i64 = 2 * 60 * 60;

/// Sessions issued at or before the returned instant have expired.
#[must_use]
pub fn session_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - TimeDelta::seconds(SESSION_TTL_SECS)
}

/// Opaque random session token.
///
/// # Examples
/// ```
/// use blog::domain::SessionToken;
///
/// let token = SessionToken::generate();
/// let parsed: SessionToken = token.to_string().parse().expect("round trip");
/// assert_eq!(parsed, token);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_distinct() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn cutoff_trails_now_by_the_session_lifetime() {
        let now = DateTime::from_timestamp(1_800_000_000, 0).expect("valid timestamp");
        let cutoff = session_cutoff(now);
        assert_eq!((now - cutoff).num_seconds(), SESSION_TTL_SECS);
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!("letmein".parse::<SessionToken>().is_err());
    }
}
