//! Post and comment domain service.
//!
//! Implements the blog query and command driving ports. Relations are plain
//! ids, so reads join authors in memory by looking each distinct author up
//! once.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::account_service::map_user_error;
use crate::domain::ports::{
    BlogCommand, BlogQuery, CommentEntry, CommentPersistenceError, CommentRepository,
    PostDetail, PostPersistenceError, PostRepository, PostSummary, UserRepository,
};
use crate::domain::{
    BlogPost, Comment, CommentText, Error, NewComment, NewPost, POST_DATE_FORMAT, PostChanges,
    PostContent, PostId, User, UserId,
};

/// Blog service implementing the post query and command ports.
pub struct BlogService<U, P, C> {
    users: Arc<U>,
    posts: Arc<P>,
    comments: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<U, P, C> Clone for BlogService<U, P, C> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            posts: Arc::clone(&self.posts),
            comments: Arc::clone(&self.comments),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U, P, C> BlogService<U, P, C> {
    pub fn new(users: Arc<U>, posts: Arc<P>, comments: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            posts,
            comments,
            clock,
        }
    }

    fn today(&self) -> String {
        self.clock.local().format(POST_DATE_FORMAT).to_string()
    }
}

fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostPersistenceError::UniqueViolation { field } => {
            Error::conflict("a post with this title already exists").with_details(json!({
                "field": field,
                "code": "duplicate_title",
            }))
        }
        PostPersistenceError::MissingReference { message } => {
            Error::not_found(format!("post author no longer exists: {message}"))
        }
    }
}

fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentPersistenceError::MissingReference { message } => {
            Error::not_found(format!("post no longer exists: {message}"))
        }
    }
}

fn post_not_found(id: PostId) -> Error {
    Error::not_found(format!("post {id} not found")).with_details(json!({ "postId": id }))
}

impl<U, P, C> BlogService<U, P, C>
where
    U: UserRepository,
    P: PostRepository,
    C: CommentRepository,
{
    /// Fetch each distinct user once.
    async fn users_by_id(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, User>, Error> {
        let mut found = HashMap::new();
        for &id in ids {
            if found.contains_key(&id) {
                continue;
            }
            let user = self
                .users
                .find_by_id(id)
                .await
                .map_err(map_user_error)?
                .ok_or_else(|| Error::internal(format!("user {id} referenced but missing")))?;
            found.insert(id, user);
        }
        Ok(found)
    }

    async fn require_post(&self, id: PostId) -> Result<BlogPost, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| post_not_found(id))
    }
}

fn author_of<'a>(authors: &'a HashMap<UserId, User>, id: UserId) -> Result<&'a User, Error> {
    authors
        .get(&id)
        .ok_or_else(|| Error::internal(format!("user {id} referenced but missing")))
}

#[async_trait]
impl<U, P, C> BlogQuery for BlogService<U, P, C>
where
    U: UserRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn list_posts(&self) -> Result<Vec<PostSummary>, Error> {
        let posts = self.posts.list().await.map_err(map_post_error)?;
        let author_ids: Vec<UserId> = posts.iter().map(|post| post.author_id).collect();
        let authors = self.users_by_id(&author_ids).await?;
        posts
            .into_iter()
            .map(|post| {
                let author_name = author_of(&authors, post.author_id)?.name().clone();
                Ok(PostSummary { post, author_name })
            })
            .collect()
    }

    async fn view_post(&self, id: PostId) -> Result<PostDetail, Error> {
        let post = self.require_post(id).await?;
        let comments = self
            .comments
            .list_for_post(id)
            .await
            .map_err(map_comment_error)?;
        let author_ids: Vec<UserId> = std::iter::once(post.author_id)
            .chain(comments.iter().map(|c| c.author_id))
            .collect();
        let authors = self.users_by_id(&author_ids).await?;

        let author_name = author_of(&authors, post.author_id)?.name().clone();
        let comments = comments
            .into_iter()
            .map(|comment| {
                let author = author_of(&authors, comment.author_id)?;
                Ok(CommentEntry {
                    author_name: author.name().clone(),
                    author_email: author.email().clone(),
                    comment,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(PostDetail {
            post,
            author_name,
            comments,
        })
    }
}

#[async_trait]
impl<U, P, C> BlogCommand for BlogService<U, P, C>
where
    U: UserRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn add_comment(
        &self,
        author: &User,
        post_id: PostId,
        text: &CommentText,
    ) -> Result<Comment, Error> {
        self.require_post(post_id).await?;
        let comment = self
            .comments
            .create(&NewComment {
                text: text.clone(),
                author_id: author.id(),
                post_id,
            })
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, %post_id, author_id = %author.id(), "comment added");
        Ok(comment)
    }

    async fn create_post(&self, author: &User, content: &PostContent) -> Result<BlogPost, Error> {
        let post = self
            .posts
            .create(&NewPost {
                content: content.clone(),
                date: self.today(),
                author_id: author.id(),
            })
            .await
            .map_err(map_post_error)?;
        info!(post_id = %post.id, author_id = %author.id(), "post created");
        Ok(post)
    }

    async fn edit_post(
        &self,
        editor: &User,
        id: PostId,
        content: &PostContent,
    ) -> Result<BlogPost, Error> {
        let changes = PostChanges {
            content: content.clone(),
            author_id: editor.id(),
        };
        let post = self
            .posts
            .update(id, &changes)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| post_not_found(id))?;
        info!(post_id = %id, editor_id = %editor.id(), "post edited");
        Ok(post)
    }

    async fn delete_post(&self, id: PostId) -> Result<(), Error> {
        if !self.posts.delete(id).await.map_err(map_post_error)? {
            return Err(post_not_found(id));
        }
        info!(post_id = %id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "blog_service_tests.rs"]
mod tests;
