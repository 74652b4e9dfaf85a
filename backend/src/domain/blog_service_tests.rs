//! Tests for the blog service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockCommentRepository, MockPostRepository, MockUserRepository};
use crate::domain::{
    CommentId, DisplayName, EmailAddress, ErrorCode, ImageUrl, PasswordCredential, PostBody,
    PostSubtitle, PostTitle, Role,
};

type Service = BlogService<MockUserRepository, MockPostRepository, MockCommentRepository>;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    // Midday keeps the local date stable across test machine time zones.
    let utc_now = Utc
        .with_ymd_and_hms(2026, 10, 15, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    Arc::new(FixtureClock { utc_now })
}

fn user(id: i32, name: &str, role: Role) -> User {
    User::new(
        UserId::new(id),
        DisplayName::new(name).expect("name"),
        EmailAddress::new(format!("{}@example.com", name.to_lowercase())).expect("email"),
        PasswordCredential::from_phc("$argon2id$stub"),
        role,
    )
}

#[fixture]
fn admin() -> User {
    user(1, "Ada", Role::Admin)
}

#[fixture]
fn content() -> PostContent {
    PostContent {
        title: PostTitle::new("First light").expect("title"),
        subtitle: PostSubtitle::new("Notes from the dawn").expect("subtitle"),
        body: PostBody::new("<p>Morning.</p>").expect("body"),
        img_url: ImageUrl::new("https://example.com/dawn.jpg").expect("url"),
    }
}

fn stored_post(id: i32, content: PostContent, author_id: UserId) -> BlogPost {
    BlogPost {
        id: PostId::new(id),
        content,
        date: "October 01, 2026".to_owned(),
        author_id,
    }
}

fn make_service(
    users: MockUserRepository,
    posts: MockPostRepository,
    comments: MockCommentRepository,
) -> Service {
    BlogService::new(
        Arc::new(users),
        Arc::new(posts),
        Arc::new(comments),
        fixture_clock(),
    )
}

#[rstest]
#[tokio::test]
async fn create_post_dates_today_and_credits_author(admin: User, content: PostContent) {
    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .withf(|new_post| new_post.date == "October 15, 2026" && new_post.author_id == UserId::new(1))
        .times(1)
        .returning(|new_post| {
            Ok(BlogPost {
                id: PostId::new(7),
                content: new_post.content.clone(),
                date: new_post.date.clone(),
                author_id: new_post.author_id,
            })
        });

    let service = make_service(MockUserRepository::new(), posts, MockCommentRepository::new());
    let post = service.create_post(&admin, &content).await.expect("created");
    assert_eq!(post.id, PostId::new(7));
    assert_eq!(post.title().as_ref(), "First light");
}

#[rstest]
#[tokio::test]
async fn duplicate_titles_conflict(admin: User, content: PostContent) {
    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .return_once(|_| Err(PostPersistenceError::unique_violation("title")));

    let service = make_service(MockUserRepository::new(), posts, MockCommentRepository::new());
    let err = service
        .create_post(&admin, &content)
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
        Some("title")
    );
}

#[rstest]
#[tokio::test]
async fn edit_reassigns_author(content: PostContent) {
    let editor = user(3, "Grace", Role::Admin);
    let mut posts = MockPostRepository::new();
    posts
        .expect_update()
        .withf(|id, changes| *id == PostId::new(2) && changes.author_id == UserId::new(3))
        .times(1)
        .returning(|id, changes| Ok(Some(stored_post(id.get(), changes.content.clone(), changes.author_id))));

    let service = make_service(MockUserRepository::new(), posts, MockCommentRepository::new());
    let post = service
        .edit_post(&editor, PostId::new(2), &content)
        .await
        .expect("edited");
    assert_eq!(post.author_id, UserId::new(3));
}

#[rstest]
#[case::edit(true)]
#[case::delete(false)]
#[tokio::test]
async fn missing_posts_are_not_found(admin: User, content: PostContent, #[case] edit: bool) {
    let mut posts = MockPostRepository::new();
    posts.expect_update().returning(|_, _| Ok(None));
    posts.expect_delete().returning(|_| Ok(false));

    let service = make_service(MockUserRepository::new(), posts, MockCommentRepository::new());
    let outcome = if edit {
        service
            .edit_post(&admin, PostId::new(99), &content)
            .await
            .map(|_| ())
    } else {
        service.delete_post(PostId::new(99)).await
    };
    assert_eq!(outcome.err().map(|e| e.code()), Some(ErrorCode::NotFound));
}

#[rstest]
#[tokio::test]
async fn commenting_on_a_missing_post_creates_nothing(admin: User) {
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_id().return_once(|_| Ok(None));
    let mut comments = MockCommentRepository::new();
    comments.expect_create().never();

    let service = make_service(MockUserRepository::new(), posts, comments);
    let text = CommentText::new("hello").expect("text");
    let err = service
        .add_comment(&admin, PostId::new(5), &text)
        .await
        .expect_err("missing post");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn comment_is_attributed_to_the_author(admin: User, content: PostContent) {
    let reader = user(2, "Bob", Role::Reader);
    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_post(5, content, admin.id()))));
    let mut comments = MockCommentRepository::new();
    comments
        .expect_create()
        .withf(|c| c.author_id == UserId::new(2) && c.post_id == PostId::new(5))
        .times(1)
        .returning(|c| {
            Ok(Comment {
                id: CommentId::new(1),
                text: c.text.clone(),
                author_id: c.author_id,
                post_id: c.post_id,
            })
        });

    let service = make_service(MockUserRepository::new(), posts, comments);
    let text = CommentText::new("hello").expect("text");
    let comment = service
        .add_comment(&reader, PostId::new(5), &text)
        .await
        .expect("comment stored");
    assert_eq!(comment.text.as_ref(), "hello");
}

#[rstest]
#[tokio::test]
async fn view_post_joins_authors_once(admin: User, content: PostContent) {
    let reader = user(2, "Bob", Role::Reader);
    let admin_id = admin.id();
    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_post(5, content, admin_id))));
    let mut comments = MockCommentRepository::new();
    comments.expect_list_for_post().return_once(|post_id| {
        Ok((1..=3)
            .map(|n| Comment {
                id: CommentId::new(n),
                text: CommentText::new(format!("comment {n}")).expect("text"),
                author_id: UserId::new(2),
                post_id,
            })
            .collect())
    });
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(2)
        .returning(move |id| {
            Ok(Some(if id == UserId::new(1) {
                admin.clone()
            } else {
                reader.clone()
            }))
        });

    let service = make_service(users, posts, comments);
    let detail = service.view_post(PostId::new(5)).await.expect("post found");
    assert_eq!(detail.author_name.as_ref(), "Ada");
    assert_eq!(detail.comments.len(), 3);
    assert!(detail
        .comments
        .iter()
        .all(|entry| entry.author_email.as_ref() == "bob@example.com"));
}

#[rstest]
#[tokio::test]
async fn list_posts_surfaces_outages() {
    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .return_once(|| Err(PostPersistenceError::connection("refused")));

    let service = make_service(MockUserRepository::new(), posts, MockCommentRepository::new());
    let err = service.list_posts().await.expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn list_posts_names_each_author_once(admin: User, content: PostContent) {
    let admin_id = admin.id();
    let mut second = content.clone();
    second.title = PostTitle::new("Second light").expect("title");
    let mut posts = MockPostRepository::new();
    posts.expect_list().return_once(move || {
        Ok(vec![
            stored_post(1, content, admin_id),
            stored_post(2, second, admin_id),
        ])
    });
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(admin)));

    let service = make_service(users, posts, MockCommentRepository::new());
    let summaries = service.list_posts().await.expect("posts listed");
    let names: Vec<&str> = summaries
        .iter()
        .map(|summary| summary.author_name.as_ref())
        .collect();
    assert_eq!(names, vec!["Ada", "Ada"]);
}
