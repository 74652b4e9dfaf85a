//! Builders wiring repositories and services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use blog::domain::ports::{CommentRepository, PostRepository, SessionRepository, UserRepository};
use blog::domain::{AccountService, Argon2Credentials, BlogService};
use blog::inbound::http::state::HttpState;
use blog::outbound::memory::MemoryStore;
use blog::outbound::persistence::{
    DieselCommentRepository, DieselPostRepository, DieselSessionRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repository handles backing both services.
pub(super) struct Stores<U, P, C, S> {
    pub users: Arc<U>,
    pub posts: Arc<P>,
    pub comments: Arc<C>,
    pub sessions: Arc<S>,
}

impl Stores<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: Arc::clone(&store),
            posts: Arc::clone(&store),
            comments: Arc::clone(&store),
            sessions: store,
        }
    }
}

/// Compose the account and blog services over `stores`.
pub(super) fn state_from_stores<U, P, C, S>(stores: Stores<U, P, C, S>) -> HttpState
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
    C: CommentRepository + 'static,
    S: SessionRepository + 'static,
{
    let Stores {
        users,
        posts,
        comments,
        sessions,
    } = stores;
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&users),
        sessions,
        Arc::new(Argon2Credentials::default()),
    ));
    let blog = Arc::new(BlogService::new(
        users,
        posts,
        comments,
        Arc::new(DefaultClock),
    ));
    HttpState::new(accounts.clone(), accounts, blog.clone(), blog)
}

/// Build handler state from the configured persistence backend.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => state_from_stores(Stores {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            posts: Arc::new(DieselPostRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            sessions: Arc::new(DieselSessionRepository::new(pool.clone())),
        }),
        None => state_from_stores(Stores::memory()),
    };
    web::Data::new(state)
}

#[cfg(test)]
pub(super) fn memory_state() -> web::Data<HttpState> {
    web::Data::new(state_from_stores(Stores::memory()))
}
