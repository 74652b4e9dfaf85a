//! PostgreSQL-backed `SessionRepository` implementation using Diesel ORM.
//!
//! Rows older than the session lifetime never resolve and are pruned
//! whenever a new session is issued.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{SessionPersistenceError, SessionRepository};
use crate::domain::{SessionToken, UserId, session_cutoff};

use super::diesel_basic_error_mapping::{
    StoreFailure, classify_diesel_error, map_basic_pool_error,
};
use super::models::NewSessionRow;
use super::pool::{DbPool, PoolError};
use super::schema::sessions;

/// Diesel-backed implementation of the session repository port.
#[derive(Clone)]
pub struct DieselSessionRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            clock: Arc::new(DefaultClock),
        }
    }
}

fn map_pool_error(error: PoolError) -> SessionPersistenceError {
    map_basic_pool_error(error, SessionPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SessionPersistenceError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => SessionPersistenceError::connection(message),
        StoreFailure::MissingReference(message) => {
            SessionPersistenceError::missing_reference(message)
        }
        StoreFailure::Query(message) | StoreFailure::UniqueViolation(message) => {
            SessionPersistenceError::query(message)
        }
    }
}

#[async_trait]
impl SessionRepository for DieselSessionRepository {
    async fn create(&self, user_id: UserId) -> Result<SessionToken, SessionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.clock.utc();
        let expired = sessions::table.filter(sessions::created_at.le(session_cutoff(now)));
        let pruned = diesel::delete(expired)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if pruned > 0 {
            debug!(pruned, "expired sessions removed");
        }
        let token = SessionToken::generate();
        diesel::insert_into(sessions::table)
            .values(&NewSessionRow {
                token: *token.as_uuid(),
                user_id: user_id.get(),
                created_at: now,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(token)
    }

    async fn resolve(
        &self,
        token: SessionToken,
    ) -> Result<Option<UserId>, SessionPersistenceError> {
        let cutoff = session_cutoff(self.clock.utc());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = sessions::table
            .find(*token.as_uuid())
            .filter(sessions::created_at.gt(cutoff))
            .select(sessions::user_id)
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(user_id.map(UserId::new))
    }

    async fn revoke(&self, token: SessionToken) -> Result<bool, SessionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(sessions::table.find(*token.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
