//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Account creation runs in a transaction that locks the `users` table before
//! counting existing rows, so exactly one concurrent first registration is
//! granted the admin role.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, EmailAddress, NewUser, PasswordCredential, Role, User, UserId,
};

use super::diesel_basic_error_mapping::{
    StoreFailure, classify_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

pub(super) fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => UserPersistenceError::connection(message),
        StoreFailure::UniqueViolation(field) => UserPersistenceError::unique_violation(field),
        StoreFailure::Query(message) | StoreFailure::MissingReference(message) => {
            UserPersistenceError::query(message)
        }
    }
}

/// Convert a database row into a validated domain user.
pub(super) fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        name,
        email,
        password,
        role,
    } = row;
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        UserPersistenceError::query(format!("stored user {id} has invalid {field}: {err}"))
    };
    let name = DisplayName::new(name).map_err(|err| corrupt("name", &err))?;
    let email = EmailAddress::new(email).map_err(|err| corrupt("email", &err))?;
    let role = role.parse::<Role>().map_err(|err| corrupt("role", &err))?;
    Ok(User::new(
        UserId::new(id),
        name,
        email,
        PasswordCredential::from_phc(password),
        role,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    diesel::sql_query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
                        .execute(conn)
                        .await?;
                    let existing: i64 = users::table.count().get_result(conn).await?;
                    let role = Role::for_new_account(existing);
                    diesel::insert_into(users::table)
                        .values(&NewUserRow {
                            name: user.name.as_ref(),
                            email: user.email.as_ref(),
                            password: user.credential.as_phc(),
                            role: role.as_str(),
                        })
                        .returning(UserRow::as_returning())
                        .get_result::<UserRow>(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row_to_user(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(user.id().get()))
            .set(&UserUpdate {
                name: user.name().as_ref(),
                email: user.email().as_ref(),
                password: user.credential().as_phc(),
                role: user.role().as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Sessions, comments and posts go with the row via ON DELETE CASCADE.
        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
