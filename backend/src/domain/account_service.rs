//! Account domain service.
//!
//! Implements registration, login, logout and identity resolution on top of
//! the user and session repositories. Password hashing runs on the blocking
//! pool because Argon2 is deliberately CPU and memory intensive.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, AccountSession, IdentityQuery, SessionPersistenceError, SessionRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    CredentialManager, Error, Identity, LoginCredentials, NewUser, Password, PasswordCredential,
    Registration, SessionToken, User,
};

/// Account service implementing the account and identity driving ports.
pub struct AccountService<U, S> {
    users: Arc<U>,
    sessions: Arc<S>,
    credentials: Arc<dyn CredentialManager>,
}

impl<U, S> Clone for AccountService<U, S> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            sessions: Arc::clone(&self.sessions),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<U, S> AccountService<U, S> {
    pub fn new(
        users: Arc<U>,
        sessions: Arc<S>,
        credentials: Arc<dyn CredentialManager>,
    ) -> Self {
        Self {
            users,
            sessions,
            credentials,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::UniqueViolation { field } => duplicate_email(&field),
    }
}

fn map_session_error(error: SessionPersistenceError) -> Error {
    match error {
        SessionPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("session repository unavailable: {message}"))
        }
        SessionPersistenceError::Query { message } => {
            Error::internal(format!("session repository error: {message}"))
        }
        SessionPersistenceError::MissingReference { message } => {
            Error::not_found(format!("account no longer exists: {message}"))
        }
    }
}

fn duplicate_email(field: &str) -> Error {
    Error::conflict("email already registered").with_details(json!({
        "field": field,
        "code": "duplicate_email",
    }))
}

impl<U, S> AccountService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    async fn hash(&self, password: &Password) -> Result<PasswordCredential, Error> {
        let manager = Arc::clone(&self.credentials);
        let password = password.clone();
        tokio::task::spawn_blocking(move || manager.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn verify(&self, password: &Password, user: &User) -> Result<bool, Error> {
        let manager = Arc::clone(&self.credentials);
        let password = password.clone();
        let credential = user.credential().clone();
        tokio::task::spawn_blocking(move || manager.verify(&password, &credential))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))
    }

    async fn open_session(&self, user: User) -> Result<AccountSession, Error> {
        let token = self
            .sessions
            .create(user.id())
            .await
            .map_err(map_session_error)?;
        debug!(user_id = %user.id(), "session opened");
        Ok(AccountSession { user, token })
    }
}

#[async_trait]
impl<U, S> AccountCommand for AccountService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    async fn register(&self, registration: &Registration) -> Result<AccountSession, Error> {
        let email = registration.credentials.email();
        if self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(duplicate_email("email"));
        }

        let credential = self.hash(registration.credentials.password()).await?;
        let user = self
            .users
            .create(&NewUser {
                name: registration.name.clone(),
                email: email.clone(),
                credential,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "account registered");
        self.open_session(user).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AccountSession, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::not_found("email is not registered"));
        };

        if !self.verify(credentials.password(), &user).await? {
            debug!(user_id = %user.id(), "password rejected");
            return Err(Error::unauthorized("password is incorrect"));
        }
        self.open_session(user).await
    }

    async fn logout(&self, token: SessionToken) -> Result<(), Error> {
        let revoked = self
            .sessions
            .revoke(token)
            .await
            .map_err(map_session_error)?;
        debug!(revoked, "session closed");
        Ok(())
    }
}

#[async_trait]
impl<U, S> IdentityQuery for AccountService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    async fn resolve(&self, token: Option<SessionToken>) -> Result<Identity, Error> {
        let Some(token) = token else {
            return Ok(Identity::Anonymous);
        };
        let Some(user_id) = self
            .sessions
            .resolve(token)
            .await
            .map_err(map_session_error)?
        else {
            return Ok(Identity::Anonymous);
        };
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?;
        Ok(user.map_or(Identity::Anonymous, Identity::Authenticated))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
