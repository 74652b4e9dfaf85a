//! Driving port for post management and commenting.
//!
//! Authorisation happens before these calls: adapters pass the already
//! authenticated (and, for post management, admin) user.

use async_trait::async_trait;

use crate::domain::{BlogPost, Comment, CommentText, Error, PostContent, PostId, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogCommand: Send + Sync {
    /// Append a comment by `author` to the post; `NotFound` when the post is
    /// gone.
    async fn add_comment(
        &self,
        author: &User,
        post_id: PostId,
        text: &CommentText,
    ) -> Result<Comment, Error>;

    /// Publish a post dated today. `Conflict` when the title is taken.
    async fn create_post(&self, author: &User, content: &PostContent) -> Result<BlogPost, Error>;

    /// Overwrite a post's content and make `editor` its author.
    async fn edit_post(
        &self,
        editor: &User,
        id: PostId,
        content: &PostContent,
    ) -> Result<BlogPost, Error>;

    /// Remove a post and its comments.
    async fn delete_post(&self, id: PostId) -> Result<(), Error>;
}
