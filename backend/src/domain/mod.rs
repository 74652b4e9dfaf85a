//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed blog model (accounts, posts, comments,
//! sessions), the guards that gate privileged operations, and the services
//! that implement the driving ports. Nothing here depends on actix or diesel;
//! adapters translate at the edges.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport agnostic failure payload.
//! - `User`, `BlogPost`, `Comment` and their validated field types.
//! - `Identity` with `Guard`, `GuardChain`, `RequireAuthenticated` and
//!   `RequireAdmin`.
//! - `AccountService` and `BlogService`.

pub mod account_service;
pub mod auth;
pub mod blog_service;
pub mod comment;
pub mod error;
pub mod identity;
pub mod password;
pub mod ports;
pub mod post;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError, Registration};
pub use self::blog_service::BlogService;
pub use self::comment::{Comment, CommentId, CommentText, EmptyComment, NewComment};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{Guard, GuardChain, Identity, RequireAdmin, RequireAuthenticated};
#[cfg(test)]
pub use self::password::MockCredentialManager;
pub use self::password::{
    Argon2Credentials, CredentialManager, Password, PasswordCredential, PasswordHashError,
    PasswordValidationError,
};
pub use self::post::{
    BlogPost, ImageUrl, NewPost, POST_DATE_FORMAT, POST_FIELD_MAX, PostBody, PostChanges,
    PostContent, PostId, PostSubtitle, PostTitle, PostValidationError,
};
pub use self::session::{SESSION_TTL_SECS, SessionToken, session_cutoff};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, EmailAddress, NewUser, Role, UnknownRole, User,
    UserId, UserValidationError,
};
