//! Port abstraction for server-side login sessions.
use async_trait::async_trait;

use crate::domain::{SessionToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by session repository adapters.
    pub enum SessionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session repository query failed: {message}",
        /// The session's user does not exist.
        MissingReference { message: String } => "session references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Open a session for `user_id` and return its fresh token.
    async fn create(&self, user_id: UserId) -> Result<SessionToken, SessionPersistenceError>;

    /// User owning `token`, if the session is still live.
    ///
    /// Sessions older than [`crate::domain::SESSION_TTL_SECS`] resolve to
    /// `None`.
    async fn resolve(&self, token: SessionToken)
    -> Result<Option<UserId>, SessionPersistenceError>;

    /// End the session. Returns `false` when the token was unknown.
    async fn revoke(&self, token: SessionToken) -> Result<bool, SessionPersistenceError>;
}
