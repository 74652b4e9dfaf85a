//! Home page and static pages.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::extractors::CurrentIdentity;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{IndexContent, NoContent, PageView, PostCard};

#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
    identity: CurrentIdentity,
) -> ApiResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    let flashes = session.take_flashes()?;
    let content = IndexContent {
        posts: posts.iter().map(PostCard::from).collect(),
    };
    Ok(PageView::new("index", &identity.0, flashes, content).respond(StatusCode::OK))
}

fn static_page(
    page: &'static str,
    session: &SessionContext,
    identity: &CurrentIdentity,
) -> ApiResult<HttpResponse> {
    let flashes = session.take_flashes()?;
    Ok(PageView::new(page, &identity.0, flashes, NoContent::default()).respond(StatusCode::OK))
}

#[get("/about")]
pub async fn about(session: SessionContext, identity: CurrentIdentity) -> ApiResult<HttpResponse> {
    static_page("about", &session, &identity)
}

#[get("/contact")]
pub async fn contact(session: SessionContext, identity: CurrentIdentity) -> ApiResult<HttpResponse> {
    static_page("contact", &session, &identity)
}
