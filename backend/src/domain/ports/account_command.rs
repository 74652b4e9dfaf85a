//! Driving port for account use-cases: registration, login and logout.
//!
//! Inbound adapters call this port with validated inputs and receive a fresh
//! session token to hand back to the client. HTTP tests substitute a mock so
//! handlers can be exercised without persistence or password hashing.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, SessionToken, User};

/// Account together with the session opened for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSession {
    pub user: User,
    pub token: SessionToken,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and log it in.
    ///
    /// Fails with `Conflict` when the email is already registered.
    async fn register(&self, registration: &Registration) -> Result<AccountSession, Error>;

    /// Check credentials and open a session.
    ///
    /// Fails with `NotFound` for an unknown email and `Unauthorized` for a
    /// wrong password.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccountSession, Error>;

    /// End the session behind `token`. The account itself is kept.
    async fn logout(&self, token: SessionToken) -> Result<(), Error>;
}
