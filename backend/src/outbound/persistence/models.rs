//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! reach the domain; repositories convert them through validated constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{blog_posts, comments, sessions, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Blog posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blog_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blog_posts)]
pub(crate) struct NewPostRow<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub date: &'a str,
    pub body: &'a str,
    pub img_url: &'a str,
}

/// Edit changeset; `date` is deliberately absent so edits keep it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = blog_posts)]
pub(crate) struct PostUpdate<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub body: &'a str,
    pub img_url: &'a str,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub text: String,
    pub author_id: i32,
    pub post_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub text: &'a str,
    pub author_id: i32,
    pub post_id: i32,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub(crate) struct NewSessionRow {
    pub token: Uuid,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}
