//! Behavioural coverage for the in-process store.

use super::*;
use crate::domain::{
    CommentText, DisplayName, ImageUrl, PasswordCredential, PostBody, PostContent, PostSubtitle,
};
use chrono::{Local, TimeDelta};
use rstest::{fixture, rstest};

use crate::domain::SESSION_TTL_SECS;

/// Clock that only moves when told to.
struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::new()
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        name: DisplayName::new(name).expect("name"),
        email: EmailAddress::new(format!("{}@example.com", name.to_lowercase())).expect("email"),
        credential: PasswordCredential::from_phc("$argon2id$stub"),
    }
}

fn content(title: &str) -> PostContent {
    PostContent {
        title: PostTitle::new(title).expect("title"),
        subtitle: PostSubtitle::new("Subtitle").expect("subtitle"),
        body: PostBody::new("<p>Body</p>").expect("body"),
        img_url: ImageUrl::new("https://example.com/img.png").expect("url"),
    }
}

async fn seed_user(store: &MemoryStore, name: &str) -> User {
    UserRepository::create(store, &new_user(name))
        .await
        .expect("user created")
}

async fn seed_post(store: &MemoryStore, author: &User, title: &str) -> BlogPost {
    PostRepository::create(
        store,
        &NewPost {
            content: content(title),
            date: "October 15, 2026".to_owned(),
            author_id: author.id(),
        },
    )
    .await
    .expect("post created")
}

async fn seed_comment(store: &MemoryStore, author: &User, post: &BlogPost) -> Comment {
    CommentRepository::create(
        store,
        &NewComment {
            text: CommentText::new("hello").expect("text"),
            author_id: author.id(),
            post_id: post.id,
        },
    )
    .await
    .expect("comment created")
}

#[rstest]
#[tokio::test]
async fn only_the_first_account_is_admin(store: MemoryStore) {
    let first = seed_user(&store, "Ada").await;
    let second = seed_user(&store, "Bob").await;
    assert_eq!(first.role(), Role::Admin);
    assert_eq!(second.role(), Role::Reader);
    assert_eq!(first.id(), UserId::new(1));
    assert_eq!(second.id(), UserId::new(2));
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected(store: MemoryStore) {
    seed_user(&store, "Ada").await;
    let err = UserRepository::create(&store, &new_user("Ada"))
        .await
        .expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::unique_violation("email"));
    assert_eq!(UserRepository::list(&store).await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn duplicate_titles_are_rejected_on_create_and_update(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    seed_post(&store, &ada, "One").await;
    let two = seed_post(&store, &ada, "Two").await;

    let err = PostRepository::create(
        &store,
        &NewPost {
            content: content("One"),
            date: "today".to_owned(),
            author_id: ada.id(),
        },
    )
    .await
    .expect_err("duplicate title");
    assert_eq!(err, PostPersistenceError::unique_violation("title"));

    let err = PostRepository::update(
        &store,
        two.id,
        &PostChanges {
            content: content("One"),
            author_id: ada.id(),
        },
    )
    .await
    .expect_err("duplicate title on edit");
    assert_eq!(err, PostPersistenceError::unique_violation("title"));
}

#[rstest]
#[tokio::test]
async fn editing_keeps_own_title_and_date(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let bob = seed_user(&store, "Bob").await;
    let post = seed_post(&store, &ada, "Same").await;

    let updated = PostRepository::update(
        &store,
        post.id,
        &PostChanges {
            content: content("Same"),
            author_id: bob.id(),
        },
    )
    .await
    .expect("update succeeds")
    .expect("post exists");
    assert_eq!(updated.author_id, bob.id());
    assert_eq!(updated.date, post.date);
}

#[rstest]
#[tokio::test]
async fn find_by_title_round_trips(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let post = seed_post(&store, &ada, "Findable").await;
    let found = PostRepository::find_by_title(&store, post.title())
        .await
        .expect("lookup");
    assert_eq!(found, Some(post));
}

#[rstest]
#[tokio::test]
async fn deleting_a_post_cascades_to_comments(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let keep = seed_post(&store, &ada, "Keep").await;
    let doomed = seed_post(&store, &ada, "Doomed").await;
    seed_comment(&store, &ada, &keep).await;
    seed_comment(&store, &ada, &doomed).await;
    seed_comment(&store, &ada, &doomed).await;

    assert!(PostRepository::delete(&store, doomed.id).await.expect("delete"));
    assert!(
        CommentRepository::list_for_post(&store, doomed.id)
            .await
            .expect("list")
            .is_empty()
    );
    assert_eq!(CommentRepository::list(&store).await.expect("list").len(), 1);
    assert!(!PostRepository::delete(&store, doomed.id).await.expect("second delete"));
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_cascades_everywhere(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let bob = seed_user(&store, "Bob").await;
    let ada_post = seed_post(&store, &ada, "By Ada").await;
    let bob_post = seed_post(&store, &bob, "By Bob").await;
    seed_comment(&store, &bob, &ada_post).await;
    let ada_on_bob = seed_comment(&store, &ada, &bob_post).await;
    let token = SessionRepository::create(&store, bob.id())
        .await
        .expect("session");

    assert!(UserRepository::delete(&store, bob.id()).await.expect("delete"));

    assert_eq!(
        SessionRepository::resolve(&store, token).await.expect("resolve"),
        None
    );
    assert_eq!(
        PostRepository::list(&store).await.expect("posts"),
        vec![ada_post.clone()]
    );
    let remaining = CommentRepository::list(&store).await.expect("comments");
    assert!(remaining.is_empty(), "bob's comment and comments on bob's post go: {remaining:?}");
    assert_eq!(
        CommentRepository::find_by_id(&store, ada_on_bob.id)
            .await
            .expect("lookup"),
        None
    );
}

#[rstest]
#[tokio::test]
async fn comments_need_live_parents(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let err = CommentRepository::create(
        &store,
        &NewComment {
            text: CommentText::new("orphan").expect("text"),
            author_id: ada.id(),
            post_id: PostId::new(404),
        },
    )
    .await
    .expect_err("missing post");
    assert!(matches!(err, CommentPersistenceError::MissingReference { .. }));
}

#[rstest]
#[tokio::test]
async fn comments_list_in_submission_order(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let post = seed_post(&store, &ada, "Ordered").await;
    let first = seed_comment(&store, &ada, &post).await;
    let second = seed_comment(&store, &ada, &post).await;
    let listed = CommentRepository::list_for_post(&store, post.id)
        .await
        .expect("list");
    assert_eq!(listed, vec![first, second]);
}

#[rstest]
#[tokio::test]
async fn revoked_sessions_stop_resolving(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let token = SessionRepository::create(&store, ada.id())
        .await
        .expect("session");
    assert_eq!(
        SessionRepository::resolve(&store, token).await.expect("resolve"),
        Some(ada.id())
    );
    assert!(SessionRepository::revoke(&store, token).await.expect("revoke"));
    assert_eq!(
        SessionRepository::resolve(&store, token).await.expect("resolve"),
        None
    );
    assert!(!SessionRepository::revoke(&store, token).await.expect("revoke again"));
    assert!(
        UserRepository::find_by_id(&store, ada.id())
            .await
            .expect("lookup")
            .is_some()
    );
}

#[rstest]
#[tokio::test]
async fn sessions_expire_with_the_cookie_lifetime() {
    let clock = ManualClock::starting_at(
        DateTime::from_timestamp(1_800_000_000, 0).expect("valid timestamp"),
    );
    let store = MemoryStore::with_clock(clock.clone());
    let ada = seed_user(&store, "Ada").await;
    let stale = SessionRepository::create(&store, ada.id())
        .await
        .expect("session");

    clock.advance(TimeDelta::seconds(SESSION_TTL_SECS - 1));
    assert_eq!(
        SessionRepository::resolve(&store, stale).await.expect("resolve"),
        Some(ada.id())
    );

    clock.advance(TimeDelta::seconds(1));
    let fresh = SessionRepository::create(&store, ada.id())
        .await
        .expect("session");
    {
        let arena = store.arena.lock().expect("arena lock");
        assert!(!arena.sessions.contains_key(&stale));
        assert!(arena.sessions.contains_key(&fresh));
    }
    assert_eq!(
        SessionRepository::resolve(&store, stale).await.expect("resolve"),
        None
    );
    assert_eq!(
        SessionRepository::resolve(&store, fresh).await.expect("resolve"),
        Some(ada.id())
    );
}

#[rstest]
#[tokio::test]
async fn sessions_need_an_existing_user(store: MemoryStore) {
    let err = SessionRepository::create(&store, UserId::new(9))
        .await
        .expect_err("missing user");
    assert!(matches!(err, SessionPersistenceError::MissingReference { .. }));
}

#[rstest]
#[tokio::test]
async fn updating_a_user_keeps_email_unique(store: MemoryStore) {
    let ada = seed_user(&store, "Ada").await;
    let mut bob = seed_user(&store, "Bob").await;
    bob.set_email(ada.email().clone());
    let err = UserRepository::update(&store, &bob)
        .await
        .expect_err("email taken");
    assert_eq!(err, UserPersistenceError::unique_violation("email"));

    bob.set_email(EmailAddress::new("robert@example.com").expect("email"));
    bob.rename(DisplayName::new("Robert").expect("name"));
    let updated = UserRepository::update(&store, &bob)
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.name().as_ref(), "Robert");
}
