//! Port abstraction for comment persistence.
use async_trait::async_trait;

use crate::domain::{Comment, CommentId, NewComment, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The post or author being referenced does not exist.
        MissingReference { message: String } => "comment references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError>;

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentPersistenceError>;

    /// Comments on `post_id` in submission order.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentPersistenceError>;

    async fn list(&self) -> Result<Vec<Comment>, CommentPersistenceError>;
}
