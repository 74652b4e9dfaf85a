//! Page views handed to the rendering collaborator.
//!
//! Each page is a camelCase JSON envelope carrying the page name, the viewer,
//! pending flashes and page-specific content. Form pages additionally echo the
//! submitted values and per-field errors.

use actix_web::HttpResponse;
use actix_web::http::{StatusCode, header};
use serde::Serialize;

use crate::domain::Identity;
use crate::domain::ports::{CommentEntry, PostDetail, PostSummary};
use crate::inbound::http::avatar::gravatar_url;
use crate::inbound::http::forms::{FieldErrors, FormValues};

/// Who is looking at the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub authenticated: bool,
    pub user_id: Option<i32>,
    pub name: Option<String>,
    pub is_admin: bool,
}

impl From<&Identity> for Viewer {
    fn from(identity: &Identity) -> Self {
        let user = identity.user();
        Self {
            authenticated: identity.is_authenticated(),
            user_id: user.map(|u| u.id().get()),
            name: user.map(|u| u.name().to_string()),
            is_admin: identity.is_admin(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub form: FormValues,
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<C> {
    pub page: &'static str,
    pub viewer: Viewer,
    pub flashes: Vec<String>,
    pub content: C,
    #[serde(flatten)]
    pub form: Option<FormState>,
}

impl<C: Serialize> PageView<C> {
    pub fn new(page: &'static str, identity: &Identity, flashes: Vec<String>, content: C) -> Self {
        Self {
            page,
            viewer: Viewer::from(identity),
            flashes,
            content,
            form: None,
        }
    }

    #[must_use]
    pub fn with_form(mut self, form: FormValues, errors: FieldErrors) -> Self {
        self.form = Some(FormState { form, errors });
        self
    }

    pub fn respond(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

/// `303 See Other` so that browsers follow with a `GET`.
pub fn see_other(location: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

/// Content of pages without data of their own.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoContent {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub img_url: String,
    pub author: String,
}

impl From<&PostSummary> for PostCard {
    fn from(summary: &PostSummary) -> Self {
        let post = &summary.post;
        Self {
            id: post.id.get(),
            title: post.content.title.to_string(),
            subtitle: post.content.subtitle.to_string(),
            date: post.date.clone(),
            img_url: post.content.img_url.to_string(),
            author: summary.author_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexContent {
    pub posts: Vec<PostCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub text: String,
    pub author: String,
    pub avatar_url: String,
}

impl From<&CommentEntry> for CommentView {
    fn from(entry: &CommentEntry) -> Self {
        Self {
            id: entry.comment.id.get(),
            text: entry.comment.text.as_ref().to_owned(),
            author: entry.author_name.to_string(),
            avatar_url: gravatar_url(&entry.author_email),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContentView {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub author: String,
    pub comments: Vec<CommentView>,
}

impl From<&PostDetail> for PostContentView {
    fn from(detail: &PostDetail) -> Self {
        let post = &detail.post;
        Self {
            id: post.id.get(),
            title: post.content.title.to_string(),
            subtitle: post.content.subtitle.to_string(),
            date: post.date.clone(),
            body: post.content.body.to_string(),
            img_url: post.content.img_url.to_string(),
            author: detail.author_name.to_string(),
            comments: detail.comments.iter().map(CommentView::from).collect(),
        }
    }
}

/// Content of the post editor; `post_id` is absent when creating.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorContent {
    pub post_id: Option<i32>,
}
