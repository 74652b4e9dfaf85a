//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! Diesel, with async support through `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel failures are classified once and mapped onto
//!   each port's error enum; unique and foreign key violations stay
//!   distinguishable.
//!
//! # Example
//!
//! ```ignore
//! use blog::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig, ensure_schema};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
//! ensure_schema(&pool).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

mod bootstrap;
mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_post_repository;
mod diesel_session_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use bootstrap::{BASELINE_SCHEMA, BootstrapError, ensure_schema};
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_session_repository::DieselSessionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
