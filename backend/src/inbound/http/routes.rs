//! Route table for the blog endpoints.
//!
//! Health probes are registered separately by the server because they do not
//! need a session.

use actix_web::web;

use crate::inbound::http::{accounts, pages, posts};

/// Register every blog endpoint on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use blog::inbound::http::routes::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::index)
        .service(pages::about)
        .service(pages::contact)
        .service(posts::show_post)
        .service(posts::submit_comment)
        .service(posts::new_post_form)
        .service(posts::create_post)
        .service(posts::edit_post_form)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(accounts::register_form)
        .service(accounts::register)
        .service(accounts::login_form)
        .service(accounts::login)
        .service(accounts::logout);
}
