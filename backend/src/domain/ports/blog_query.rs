//! Driving port for reading posts and their discussions.

use async_trait::async_trait;

use crate::domain::{BlogPost, Comment, DisplayName, EmailAddress, Error, PostId};

/// Post listed on the home page with its author's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub post: BlogPost,
    pub author_name: DisplayName,
}

/// Comment joined with the details needed to attribute it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author_name: DisplayName,
    /// Used to derive the commenter's avatar.
    pub author_email: EmailAddress,
}

/// Everything shown on a single post page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: BlogPost,
    pub author_name: DisplayName,
    pub comments: Vec<CommentEntry>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogQuery: Send + Sync {
    /// All posts in publication order.
    async fn list_posts(&self) -> Result<Vec<PostSummary>, Error>;

    /// A post with its author and comments; `NotFound` when absent.
    async fn view_post(&self, id: PostId) -> Result<PostDetail, Error>;
}
