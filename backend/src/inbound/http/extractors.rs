//! Request extractors resolving the caller's identity.
//!
//! [`CurrentIdentity`] never fails for anonymous callers. [`AuthenticatedUser`]
//! and [`AdminUser`] run a [`GuardChain`] before the handler body executes, so
//! a rejected request never reaches the handler.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, GuardChain, Identity, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn resolve_identity(
    req: &HttpRequest,
    payload: &mut Payload,
) -> LocalBoxFuture<'static, Result<Identity, Error>> {
    let session = SessionContext::from_request(req, payload);
    let state = req.app_data::<web::Data<HttpState>>().cloned();
    Box::pin(async move {
        let state = state.ok_or_else(|| Error::internal("http state is not configured"))?;
        let session = session.await.map_err(Error::from)?;
        let token = session.token()?;
        state.identity.resolve(token).await
    })
}

fn guarded_user(
    req: &HttpRequest,
    payload: &mut Payload,
    chain: GuardChain,
) -> LocalBoxFuture<'static, Result<User, Error>> {
    let identity = resolve_identity(req, payload);
    Box::pin(async move {
        let identity = identity.await?;
        chain.check(&identity)?;
        identity
            .into_user()
            .ok_or_else(|| Error::unauthorized("login required"))
    })
}

/// Identity of the caller; anonymous when no live session exists.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl FromRequest for CurrentIdentity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = resolve_identity(req, payload);
        Box::pin(async move { identity.await.map(Self).map_err(actix_web::Error::from) })
    }
}

/// Logged-in caller; anonymous requests are rejected with `401`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = guarded_user(req, payload, GuardChain::authenticated());
        Box::pin(async move { user.await.map(Self).map_err(actix_web::Error::from) })
    }
}

/// Administrator; anonymous callers get `401` and readers `403`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = guarded_user(req, payload, GuardChain::admin());
        Box::pin(async move { user.await.map(Self).map_err(actix_web::Error::from) })
    }
}
