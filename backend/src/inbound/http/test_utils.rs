//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{
    MockAccountCommand, MockBlogCommand, MockBlogQuery, MockIdentityQuery,
};
use crate::domain::{DisplayName, EmailAddress, Identity, PasswordCredential, Role, User, UserId};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

pub fn fixture_user(id: i32, name: &str, role: Role) -> User {
    User::new(
        UserId::new(id),
        DisplayName::new(name).expect("fixture name"),
        EmailAddress::new(format!("{}@example.com", name.to_lowercase())).expect("fixture email"),
        PasswordCredential::from_phc("$argon2id$stub"),
        role,
    )
}

/// Ports bundle whose identity query always answers `identity`.
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub posts: MockBlogQuery,
    pub editor: MockBlogCommand,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            accounts: MockAccountCommand::new(),
            posts: MockBlogQuery::new(),
            editor: MockBlogCommand::new(),
        }
    }
}

impl MockPorts {
    pub fn into_state(self, identity: Identity) -> HttpState {
        let mut query = MockIdentityQuery::new();
        query
            .expect_resolve()
            .returning(move |_| Ok(identity.clone()));
        HttpState::new(
            Arc::new(self.accounts),
            Arc::new(query),
            Arc::new(self.posts),
            Arc::new(self.editor),
        )
    }
}

pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}
