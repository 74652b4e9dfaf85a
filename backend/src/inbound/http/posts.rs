//! Post and comment handlers.
//!
//! ```text
//! GET  /post/{id}          post page with comments
//! POST /post/{id}          submit a comment
//! GET  /new-post           empty editor (admin)
//! POST /new-post           create a post (admin)
//! GET  /edit-post/{id}     prefilled editor (admin)
//! POST /edit-post/{id}     overwrite a post (admin)
//! GET  /delete/{id}        delete a post and its comments (admin)
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, route, web};

use crate::domain::{Error, ErrorCode, Identity, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::extractors::{AdminUser, CurrentIdentity};
use crate::inbound::http::forms::{CommentForm, FieldErrors, PostForm};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{EditorContent, PageView, PostContentView, see_other};

pub(crate) const COMMENT_LOGIN_REQUIRED: &str = "you need to login or register to comment";
pub(crate) const EDITOR_PAGE: &str = "make-post";

/// Field named by a conflict's details, if the conflict is tied to one.
pub(crate) fn conflicting_field(error: &Error) -> Option<String> {
    if !matches!(error.code(), ErrorCode::Conflict) {
        return None;
    }
    error
        .details()?
        .get("field")?
        .as_str()
        .map(str::to_owned)
}

async fn render_post(
    state: &HttpState,
    session: &SessionContext,
    identity: &Identity,
    id: PostId,
) -> ApiResult<PageView<PostContentView>> {
    let detail = state.posts.view_post(id).await?;
    let flashes = session.take_flashes()?;
    Ok(PageView::new(
        "post",
        identity,
        flashes,
        PostContentView::from(&detail),
    ))
}

fn render_editor(
    session: &SessionContext,
    identity: &Identity,
    post_id: Option<PostId>,
    form: &PostForm,
    errors: FieldErrors,
    status: StatusCode,
) -> ApiResult<HttpResponse> {
    let flashes = session.take_flashes()?;
    let content = EditorContent {
        post_id: post_id.map(PostId::get),
    };
    Ok(PageView::new(EDITOR_PAGE, identity, flashes, content)
        .with_form(form.values(), errors)
        .respond(status))
}

/// Re-render the editor for a title clash; any other failure propagates.
fn editor_conflict(
    error: Error,
    session: &SessionContext,
    identity: &Identity,
    post_id: Option<PostId>,
    form: &PostForm,
) -> ApiResult<HttpResponse> {
    let Some(field) = conflicting_field(&error) else {
        return Err(error);
    };
    let mut errors = FieldErrors::default();
    errors.add(field, error.message());
    render_editor(
        session,
        identity,
        post_id,
        form,
        errors,
        StatusCode::CONFLICT,
    )
}

#[get("/post/{id}")]
pub async fn show_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    identity: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let view = render_post(&state, &session, &identity.0, id).await?;
    Ok(view
        .with_form(CommentForm::default().values(), FieldErrors::default())
        .respond(StatusCode::OK))
}

/// Validate first, then require a login, then persist.
#[post("/post/{id}")]
pub async fn submit_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    identity: CurrentIdentity,
    path: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let CurrentIdentity(identity) = identity;
    let form = form.into_inner();

    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            let view = render_post(&state, &session, &identity, id).await?;
            return Ok(view
                .with_form(form.values(), errors)
                .respond(StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    let Some(author) = identity.user() else {
        session.push_flash(COMMENT_LOGIN_REQUIRED)?;
        return Ok(see_other("/login"));
    };

    state.editor.add_comment(author, id, &text).await?;
    let view = render_post(&state, &session, &identity, id).await?;
    Ok(view
        .with_form(CommentForm::default().values(), FieldErrors::default())
        .respond(StatusCode::OK))
}

#[get("/new-post")]
pub async fn new_post_form(
    session: SessionContext,
    admin: AdminUser,
) -> ApiResult<HttpResponse> {
    let identity = Identity::Authenticated(admin.0);
    render_editor(
        &session,
        &identity,
        None,
        &PostForm::default(),
        FieldErrors::default(),
        StatusCode::OK,
    )
}

#[post("/new-post")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    admin: AdminUser,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let AdminUser(author) = admin;
    let identity = Identity::Authenticated(author.clone());
    let content = match form.validate() {
        Ok(content) => content,
        Err(errors) => {
            return render_editor(
                &session,
                &identity,
                None,
                &form,
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };
    match state.editor.create_post(&author, &content).await {
        Ok(_) => Ok(see_other("/")),
        Err(error) => editor_conflict(error, &session, &identity, None, &form),
    }
}

#[get("/edit-post/{id}")]
pub async fn edit_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    admin: AdminUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let detail = state.posts.view_post(id).await?;
    let identity = Identity::Authenticated(admin.0);
    render_editor(
        &session,
        &identity,
        Some(id),
        &PostForm::from_post(&detail.post),
        FieldErrors::default(),
        StatusCode::OK,
    )
}

#[post("/edit-post/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    admin: AdminUser,
    path: web::Path<i32>,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let form = form.into_inner();
    let AdminUser(editor) = admin;
    let identity = Identity::Authenticated(editor.clone());
    let content = match form.validate() {
        Ok(content) => content,
        Err(errors) => {
            return render_editor(
                &session,
                &identity,
                Some(id),
                &form,
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };
    match state.editor.edit_post(&editor, id, &content).await {
        Ok(post) => Ok(see_other(format!("/post/{}", post.id))),
        Err(error) => editor_conflict(error, &session, &identity, Some(id), &form),
    }
}

#[route("/delete/{id}", method = "GET", method = "POST")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .editor
        .delete_post(PostId::new(path.into_inner()))
        .await?;
    Ok(see_other("/"))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
