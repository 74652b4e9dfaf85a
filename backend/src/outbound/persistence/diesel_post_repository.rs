//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{
    BlogPost, ImageUrl, NewPost, PostBody, PostChanges, PostContent, PostId, PostSubtitle,
    PostTitle, UserId,
};

use super::diesel_basic_error_mapping::{
    StoreFailure, classify_diesel_error, map_basic_pool_error,
};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::blog_posts;

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    map_basic_pool_error(error, PostPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => PostPersistenceError::connection(message),
        StoreFailure::Query(message) => PostPersistenceError::query(message),
        StoreFailure::UniqueViolation(field) => PostPersistenceError::unique_violation(field),
        StoreFailure::MissingReference(message) => {
            PostPersistenceError::missing_reference(message)
        }
    }
}

fn row_to_post(row: PostRow) -> Result<BlogPost, PostPersistenceError> {
    let PostRow {
        id,
        author_id,
        title,
        subtitle,
        date,
        body,
        img_url,
    } = row;
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        PostPersistenceError::query(format!("stored post {id} has invalid {field}: {err}"))
    };
    let content = PostContent {
        title: PostTitle::new(title).map_err(|err| corrupt("title", &err))?,
        subtitle: PostSubtitle::new(subtitle).map_err(|err| corrupt("subtitle", &err))?,
        body: PostBody::new(body).map_err(|err| corrupt("body", &err))?,
        img_url: ImageUrl::new(img_url).map_err(|err| corrupt("img_url", &err))?,
    };
    Ok(BlogPost {
        id: PostId::new(id),
        content,
        date,
        author_id: UserId::new(author_id),
    })
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &NewPost) -> Result<BlogPost, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(blog_posts::table)
            .values(&NewPostRow {
                author_id: post.author_id.get(),
                title: post.content.title.as_ref(),
                subtitle: post.content.subtitle.as_ref(),
                date: post.date.as_str(),
                body: post.content.body.as_ref(),
                img_url: post.content.img_url.as_ref(),
            })
            .returning(PostRow::as_returning())
            .get_result::<PostRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_post(row)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<BlogPost>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        blog_posts::table
            .find(id.get())
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_post)
            .transpose()
    }

    async fn find_by_title(
        &self,
        title: &PostTitle,
    ) -> Result<Option<BlogPost>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        blog_posts::table
            .filter(blog_posts::title.eq(title.as_ref()))
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_post)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<BlogPost>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = blog_posts::table
            .order(blog_posts::id.asc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_post).collect()
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<BlogPost>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(blog_posts::table.find(id.get()))
            .set(&PostUpdate {
                author_id: changes.author_id.get(),
                title: changes.content.title.as_ref(),
                subtitle: changes.content.subtitle.as_ref(),
                body: changes.content.body.as_ref(),
                img_url: changes.content.img_url.as_ref(),
            })
            .returning(PostRow::as_returning())
            .get_result::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_post)
            .transpose()
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Comments are removed by the comments.post_id ON DELETE CASCADE.
        let deleted = diesel::delete(blog_posts::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn row(img_url: &str) -> PostRow {
        PostRow {
            id: 3,
            author_id: 1,
            title: "Hello".to_owned(),
            subtitle: "World".to_owned(),
            date: "October 15, 2026".to_owned(),
            body: "<p>Hi</p>".to_owned(),
            img_url: img_url.to_owned(),
        }
    }

    #[rstest]
    fn rows_convert_to_posts() {
        let post = row_to_post(row("https://example.com/a.png")).expect("valid row");
        assert_eq!(post.id, PostId::new(3));
        assert_eq!(post.date, "October 15, 2026");
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let err = row_to_post(row("nonsense")).expect_err("corrupt url");
        assert!(matches!(err, PostPersistenceError::Query { .. }));
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, "unique")]
    #[case(DatabaseErrorKind::ForeignKeyViolation, "missing")]
    fn constraint_violations_map_to_port_variants(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: &str,
    ) {
        let err = map_diesel_error(DieselError::DatabaseError(
            kind,
            Box::new("constraint".to_owned()),
        ));
        let actual = match err {
            PostPersistenceError::UniqueViolation { .. } => "unique",
            PostPersistenceError::MissingReference { .. } => "missing",
            _ => "other",
        };
        assert_eq!(actual, expected);
    }
}
