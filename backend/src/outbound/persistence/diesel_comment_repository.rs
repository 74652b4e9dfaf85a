//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, CommentId, CommentText, NewComment, PostId, UserId};

use super::diesel_basic_error_mapping::{
    StoreFailure, classify_diesel_error, map_basic_pool_error,
};
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    map_basic_pool_error(error, CommentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => CommentPersistenceError::connection(message),
        StoreFailure::MissingReference(message) => {
            CommentPersistenceError::missing_reference(message)
        }
        StoreFailure::Query(message) | StoreFailure::UniqueViolation(message) => {
            CommentPersistenceError::query(message)
        }
    }
}

fn row_to_comment(row: CommentRow) -> Result<Comment, CommentPersistenceError> {
    let text = CommentText::new(row.text).map_err(|err| {
        CommentPersistenceError::query(format!("stored comment {} is invalid: {err}", row.id))
    })?;
    Ok(Comment {
        id: CommentId::new(row.id),
        text,
        author_id: UserId::new(row.author_id),
        post_id: PostId::new(row.post_id),
    })
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                text: comment.text.as_ref(),
                author_id: comment.author_id.get(),
                post_id: comment.post_id.get(),
            })
            .returning(CommentRow::as_returning())
            .get_result::<CommentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_comment(row)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        comments::table
            .find(id.get())
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_comment)
            .transpose()
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(post_id.get()))
            .order(comments::id.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }

    async fn list(&self) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .order(comments::id.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }
}
