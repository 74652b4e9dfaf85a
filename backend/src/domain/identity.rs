//! Request identity and the guards that gate privileged operations.
//!
//! Guards compose into a [`GuardChain`] evaluated in order; the first failing
//! guard decides the outcome. Admin routes use
//! `[RequireAuthenticated, RequireAdmin]`, so anonymous visitors are told to
//! authenticate before a logged-in reader is told they lack permission.

use super::Error;
use super::user::User;

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Identity {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    /// Take the user out of an authenticated identity.
    #[must_use]
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}

/// A single authorisation predicate over an [`Identity`].
pub trait Guard: Send + Sync {
    fn check(&self, identity: &Identity) -> Result<(), Error>;
}

/// Rejects anonymous visitors with `Unauthorized`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAuthenticated;

impl Guard for RequireAuthenticated {
    fn check(&self, identity: &Identity) -> Result<(), Error> {
        if identity.is_authenticated() {
            Ok(())
        } else {
            Err(Error::unauthorized("login required"))
        }
    }
}

/// Rejects everyone except administrators with `Forbidden`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAdmin;

impl Guard for RequireAdmin {
    fn check(&self, identity: &Identity) -> Result<(), Error> {
        if identity.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("administrator access required"))
        }
    }
}

/// Ordered sequence of guards; stops at the first rejection.
///
/// # Examples
/// ```
/// use blog::domain::{ErrorCode, GuardChain, Identity};
///
/// let chain = GuardChain::admin();
/// let err = chain.check(&Identity::Anonymous).expect_err("anonymous is rejected");
/// assert_eq!(err.code(), ErrorCode::Unauthorized);
/// ```
pub struct GuardChain {
    guards: Vec<Box<dyn Guard>>,
}

impl GuardChain {
    #[must_use]
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Append a guard to the end of the chain.
    #[must_use]
    pub fn then(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Chain used by routes that only need a logged-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::new().then(RequireAuthenticated)
    }

    /// Chain used by post management routes.
    #[must_use]
    pub fn admin() -> Self {
        Self::authenticated().then(RequireAdmin)
    }

    pub fn check(&self, identity: &Identity) -> Result<(), Error> {
        self.guards.iter().try_for_each(|guard| guard.check(identity))
    }
}

impl Default for GuardChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardChain")
            .field("len", &self.guards.len())
            .finish()
    }
}
