//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod blog_command;
mod blog_query;
mod comment_repository;
mod identity_query;
mod post_repository;
mod session_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, AccountSession};
#[cfg(test)]
pub use blog_command::MockBlogCommand;
pub use blog_command::BlogCommand;
#[cfg(test)]
pub use blog_query::MockBlogQuery;
pub use blog_query::{BlogQuery, CommentEntry, PostDetail, PostSummary};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use identity_query::MockIdentityQuery;
pub use identity_query::IdentityQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionPersistenceError, SessionRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
