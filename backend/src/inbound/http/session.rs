//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie only ever holds an opaque [`SessionToken`] and pending flash
//! messages; identity is resolved server-side on every request.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionToken};

pub(crate) const TOKEN_KEY: &str = "session_token";
pub(crate) const FLASH_KEY: &str = "flashes";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind a freshly issued session token, rotating the cookie first.
    pub fn persist_token(&self, token: SessionToken) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(TOKEN_KEY, token.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Token carried by the cookie, if any.
    ///
    /// A value that does not parse is logged and treated as absent.
    pub fn token(&self) -> Result<Option<SessionToken>, Error> {
        let raw = self
            .0
            .get::<String>(TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match raw.parse() {
            Ok(token) => Some(token),
            Err(error) => {
                tracing::warn!(%error, "invalid session token in cookie");
                None
            }
        }))
    }

    /// Drop every value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Queue a one-shot message for the next rendered page.
    pub fn push_flash(&self, message: impl Into<String>) -> Result<(), Error> {
        let mut pending = self.peek_flashes()?;
        pending.push(message.into());
        self.0
            .insert(FLASH_KEY, pending)
            .map_err(|error| Error::internal(format!("failed to store flash: {error}")))
    }

    /// Remove and return all queued flash messages.
    pub fn take_flashes(&self) -> Result<Vec<String>, Error> {
        let pending = self.peek_flashes()?;
        if !pending.is_empty() {
            self.0.remove(FLASH_KEY);
        }
        Ok(pending)
    }

    fn peek_flashes(&self) -> Result<Vec<String>, Error> {
        self.0
            .get::<Vec<String>>(FLASH_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read flashes: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
