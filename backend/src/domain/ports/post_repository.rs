//! Port abstraction for blog post persistence.
use async_trait::async_trait;

use crate::domain::{BlogPost, NewPost, PostChanges, PostId, PostTitle};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// Another post already uses the title.
        UniqueViolation { field: String } => "post {field} already exists",
        /// The referenced author does not exist.
        MissingReference { message: String } => "post references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &NewPost) -> Result<BlogPost, PostPersistenceError>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<BlogPost>, PostPersistenceError>;

    async fn find_by_title(
        &self,
        title: &PostTitle,
    ) -> Result<Option<BlogPost>, PostPersistenceError>;

    /// All posts ordered by id.
    async fn list(&self) -> Result<Vec<BlogPost>, PostPersistenceError>;

    /// Replace a post's content and author, keeping its date. Returns `None`
    /// when the post does not exist.
    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<BlogPost>, PostPersistenceError>;

    /// Delete a post and its comments. Returns `false` when nothing was
    /// deleted.
    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError>;
}
