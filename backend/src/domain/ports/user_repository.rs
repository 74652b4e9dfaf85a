//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        UniqueViolation { field: String } => "user {field} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. The store assigns the id and grants the admin
    /// role only when no other account exists, atomically with the insert.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Look up an account by its normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// All accounts ordered by id.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite name, email, credential and role. Returns `None` when the
    /// account no longer exists.
    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError>;

    /// Delete an account together with its sessions, comments and posts.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
