//! Driving port resolving the identity behind a session token.

use async_trait::async_trait;

use crate::domain::{Error, Identity, SessionToken};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Missing, unknown and orphaned tokens all resolve to
    /// [`Identity::Anonymous`]; only storage failures are errors.
    async fn resolve(&self, token: Option<SessionToken>) -> Result<Identity, Error>;
}
