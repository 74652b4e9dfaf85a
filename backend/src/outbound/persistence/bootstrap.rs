//! One-shot baseline schema bootstrap.
//!
//! Creates the blog tables when they are missing and leaves existing tables
//! untouched. There is no versioned migration history; later schema changes
//! need to be applied out of band.

use diesel_async::SimpleAsyncConnection;
use tracing::info;

use super::pool::{DbPool, PoolError};

/// Baseline DDL. Statements are idempotent.
pub const BASELINE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(100) NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role VARCHAR(16) NOT NULL DEFAULT 'reader' CHECK (role IN ('admin', 'reader'))
);

CREATE TABLE IF NOT EXISTS blog_posts (
    id SERIAL PRIMARY KEY,
    author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    title VARCHAR(250) NOT NULL UNIQUE,
    subtitle VARCHAR(250) NOT NULL,
    date VARCHAR(250) NOT NULL,
    body TEXT NOT NULL,
    img_url VARCHAR(250) NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id SERIAL PRIMARY KEY,
    text TEXT NOT NULL,
    author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    post_id INTEGER NOT NULL REFERENCES blog_posts (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS comments_post_id_idx ON comments (post_id);

CREATE TABLE IF NOT EXISTS sessions (
    token UUID PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS sessions_user_id_idx ON sessions (user_id);
";

/// Errors raised while applying the baseline schema.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("failed to apply baseline schema: {0}")]
    Apply(#[from] diesel::result::Error),
}

/// Create any missing tables.
///
/// # Errors
/// Fails when a connection cannot be checked out or the DDL is rejected.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), BootstrapError> {
    let mut conn = pool.get().await?;
    conn.batch_execute(BASELINE_SCHEMA).await?;
    info!("baseline schema ensured");
    Ok(())
}
