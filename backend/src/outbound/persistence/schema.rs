//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the DDL applied by [`super::bootstrap`]. Every foreign key
//! cascades on delete: removing a user removes their sessions, comments and
//! posts; removing a post removes its comments.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int4,
        name -> Varchar,
        /// Normalised (trimmed, lower-case) and unique.
        email -> Varchar,
        /// PHC-formatted Argon2id credential.
        password -> Text,
        /// `admin` or `reader`.
        role -> Varchar,
    }
}

diesel::table! {
    blog_posts (id) {
        id -> Int4,
        author_id -> Int4,
        /// Unique across posts.
        title -> Varchar,
        subtitle -> Varchar,
        /// Display date, e.g. `October 15, 2026`.
        date -> Varchar,
        body -> Text,
        img_url -> Varchar,
    }
}

diesel::table! {
    comments (id) {
        id -> Int4,
        text -> Text,
        author_id -> Int4,
        post_id -> Int4,
    }
}

diesel::table! {
    /// Server-side login sessions keyed by the token held in the cookie.
    sessions (token) {
        token -> Uuid,
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(blog_posts -> users (author_id));
diesel::joinable!(comments -> blog_posts (post_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, blog_posts, comments, sessions);
