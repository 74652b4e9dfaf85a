//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, BlogCommand, BlogQuery, IdentityQuery};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use blog::domain::{AccountService, Argon2Credentials, BlogService};
/// use blog::inbound::http::state::HttpState;
/// use blog::outbound::memory::MemoryStore;
///
/// let store = Arc::new(MemoryStore::new());
/// let accounts = Arc::new(AccountService::new(
///     Arc::clone(&store),
///     Arc::clone(&store),
///     Arc::new(Argon2Credentials::default()),
/// ));
/// let blog = Arc::new(BlogService::new(
///     Arc::clone(&store),
///     Arc::clone(&store),
///     Arc::clone(&store),
///     Arc::new(mockable::DefaultClock),
/// ));
/// let state = HttpState::new(accounts.clone(), accounts, blog.clone(), blog);
/// let _identity = state.identity.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub identity: Arc<dyn IdentityQuery>,
    pub posts: Arc<dyn BlogQuery>,
    pub editor: Arc<dyn BlogCommand>,
}

impl HttpState {
    pub fn new(
        accounts: Arc<dyn AccountCommand>,
        identity: Arc<dyn IdentityQuery>,
        posts: Arc<dyn BlogQuery>,
        editor: Arc<dyn BlogCommand>,
    ) -> Self {
        Self {
            accounts,
            identity,
            posts,
            editor,
        }
    }
}
