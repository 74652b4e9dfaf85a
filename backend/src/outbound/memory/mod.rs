//! In-process arena store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration tests.
//! All rows live behind a single mutex, so each port operation is atomic and
//! observes the same uniqueness, reference and cascade rules as the
//! PostgreSQL schema.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, PostPersistenceError, PostRepository,
    SessionPersistenceError, SessionRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    BlogPost, Comment, CommentId, EmailAddress, NewComment, NewPost, NewUser, PostChanges, PostId,
    PostTitle, Role, SessionToken, User, UserId, session_cutoff,
};

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: UserId,
    issued_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Arena {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, BlogPost>,
    comments: BTreeMap<CommentId, Comment>,
    sessions: HashMap<SessionToken, SessionEntry>,
    last_user_id: i32,
    last_post_id: i32,
    last_comment_id: i32,
}

/// Advance a serial counter the way a `SERIAL` column would.
fn next_serial(counter: &mut i32) -> Option<i32> {
    *counter = counter.checked_add(1)?;
    Some(*counter)
}

impl Arena {
    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email() == email && Some(user.id()) != except)
    }

    fn title_taken(&self, title: &PostTitle, except: Option<PostId>) -> bool {
        self.posts
            .values()
            .any(|post| post.title() == title && Some(post.id) != except)
    }

    fn remove_post(&mut self, id: PostId) -> bool {
        let removed = self.posts.remove(&id).is_some();
        if removed {
            self.comments.retain(|_, comment| comment.post_id != id);
        }
        removed
    }

    fn remove_user(&mut self, id: UserId) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        self.sessions.retain(|_, entry| entry.user_id != id);
        self.comments.retain(|_, comment| comment.author_id != id);
        let authored: Vec<PostId> = self
            .posts
            .values()
            .filter(|post| post.author_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in authored {
            self.remove_post(post_id);
        }
        true
    }
}

/// Mutex-guarded arena shared by all four repository ports.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use blog::outbound::memory::MemoryStore;
///
/// let store = Arc::new(MemoryStore::new());
/// let for_users = Arc::clone(&store);
/// let for_posts = Arc::clone(&store);
/// # let _ = (for_users, for_posts);
/// ```
pub struct MemoryStore {
    arena: Mutex<Arena>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Store whose session expiry follows `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            arena: Mutex::new(Arena::default()),
            clock,
        }
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, Arena>, E> {
        self.arena
            .lock()
            .map_err(|_| poisoned("memory store lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut arena = self.lock(UserPersistenceError::query)?;
        if arena.email_taken(&user.email, None) {
            return Err(UserPersistenceError::unique_violation("email"));
        }
        let role = Role::for_new_account(i64::try_from(arena.users.len()).unwrap_or(i64::MAX));
        let id = next_serial(&mut arena.last_user_id)
            .map(UserId::new)
            .ok_or_else(|| UserPersistenceError::query("user id space exhausted"))?;
        let created = User::new(
            id,
            user.name.clone(),
            user.email.clone(),
            user.credential.clone(),
            role,
        );
        arena.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let arena = self.lock(UserPersistenceError::query)?;
        Ok(arena.users.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let arena = self.lock(UserPersistenceError::query)?;
        Ok(arena.users.values().find(|user| user.email() == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let arena = self.lock(UserPersistenceError::query)?;
        Ok(arena.users.values().cloned().collect())
    }

    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let mut arena = self.lock(UserPersistenceError::query)?;
        if !arena.users.contains_key(&user.id()) {
            return Ok(None);
        }
        if arena.email_taken(user.email(), Some(user.id())) {
            return Err(UserPersistenceError::unique_violation("email"));
        }
        arena.users.insert(user.id(), user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut arena = self.lock(UserPersistenceError::query)?;
        Ok(arena.remove_user(id))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: &NewPost) -> Result<BlogPost, PostPersistenceError> {
        let mut arena = self.lock(PostPersistenceError::query)?;
        if !arena.users.contains_key(&post.author_id) {
            return Err(PostPersistenceError::missing_reference(format!(
                "user {}",
                post.author_id
            )));
        }
        if arena.title_taken(&post.content.title, None) {
            return Err(PostPersistenceError::unique_violation("title"));
        }
        let id = next_serial(&mut arena.last_post_id)
            .map(PostId::new)
            .ok_or_else(|| PostPersistenceError::query("post id space exhausted"))?;
        let created = BlogPost {
            id,
            content: post.content.clone(),
            date: post.date.clone(),
            author_id: post.author_id,
        };
        arena.posts.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<BlogPost>, PostPersistenceError> {
        let arena = self.lock(PostPersistenceError::query)?;
        Ok(arena.posts.get(&id).cloned())
    }

    async fn find_by_title(
        &self,
        title: &PostTitle,
    ) -> Result<Option<BlogPost>, PostPersistenceError> {
        let arena = self.lock(PostPersistenceError::query)?;
        Ok(arena.posts.values().find(|post| post.title() == title).cloned())
    }

    async fn list(&self) -> Result<Vec<BlogPost>, PostPersistenceError> {
        let arena = self.lock(PostPersistenceError::query)?;
        Ok(arena.posts.values().cloned().collect())
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<BlogPost>, PostPersistenceError> {
        let mut arena = self.lock(PostPersistenceError::query)?;
        if !arena.posts.contains_key(&id) {
            return Ok(None);
        }
        if !arena.users.contains_key(&changes.author_id) {
            return Err(PostPersistenceError::missing_reference(format!(
                "user {}",
                changes.author_id
            )));
        }
        if arena.title_taken(&changes.content.title, Some(id)) {
            return Err(PostPersistenceError::unique_violation("title"));
        }
        let Some(post) = arena.posts.get_mut(&id) else {
            return Ok(None);
        };
        post.content = changes.content.clone();
        post.author_id = changes.author_id;
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut arena = self.lock(PostPersistenceError::query)?;
        Ok(arena.remove_post(id))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut arena = self.lock(CommentPersistenceError::query)?;
        if !arena.posts.contains_key(&comment.post_id) {
            return Err(CommentPersistenceError::missing_reference(format!(
                "post {}",
                comment.post_id
            )));
        }
        if !arena.users.contains_key(&comment.author_id) {
            return Err(CommentPersistenceError::missing_reference(format!(
                "user {}",
                comment.author_id
            )));
        }
        let id = next_serial(&mut arena.last_comment_id)
            .map(CommentId::new)
            .ok_or_else(|| CommentPersistenceError::query("comment id space exhausted"))?;
        let created = Comment {
            id,
            text: comment.text.clone(),
            author_id: comment.author_id,
            post_id: comment.post_id,
        };
        arena.comments.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        let arena = self.lock(CommentPersistenceError::query)?;
        Ok(arena.comments.get(&id).cloned())
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentPersistenceError> {
        let arena = self.lock(CommentPersistenceError::query)?;
        Ok(arena
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Comment>, CommentPersistenceError> {
        let arena = self.lock(CommentPersistenceError::query)?;
        Ok(arena.comments.values().cloned().collect())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create(&self, user_id: UserId) -> Result<SessionToken, SessionPersistenceError> {
        let mut arena = self.lock(SessionPersistenceError::query)?;
        if !arena.users.contains_key(&user_id) {
            return Err(SessionPersistenceError::missing_reference(format!(
                "user {user_id}"
            )));
        }
        let now = self.clock.utc();
        let cutoff = session_cutoff(now);
        arena.sessions.retain(|_, entry| entry.issued_at > cutoff);
        let token = SessionToken::generate();
        arena.sessions.insert(
            token,
            SessionEntry {
                user_id,
                issued_at: now,
            },
        );
        Ok(token)
    }

    async fn resolve(
        &self,
        token: SessionToken,
    ) -> Result<Option<UserId>, SessionPersistenceError> {
        let cutoff = session_cutoff(self.clock.utc());
        let mut arena = self.lock(SessionPersistenceError::query)?;
        match arena.sessions.get(&token).copied() {
            Some(entry) if entry.issued_at > cutoff => Ok(Some(entry.user_id)),
            Some(_) => {
                arena.sessions.remove(&token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn revoke(&self, token: SessionToken) -> Result<bool, SessionPersistenceError> {
        let mut arena = self.lock(SessionPersistenceError::query)?;
        Ok(arena.sessions.remove(&token).is_some())
    }
}

#[cfg(test)]
mod tests;
