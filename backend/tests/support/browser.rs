//! In-process browser for blog integration tests.
//!
//! Each request builds a fresh app over a shared [`MemoryStore`] and session
//! key, so cookies issued by one request stay valid for the next.

use std::sync::Arc;

use actix_session::config::CookieContentSecurity;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use argon2::Params;
use serde::Serialize;
use serde_json::Value;

use blog::Trace;
use blog::domain::{AccountService, Argon2Credentials, BlogService};
use blog::inbound::http::routes::configure;
use blog::inbound::http::state::HttpState;
use blog::outbound::memory::MemoryStore;

/// Argon2 with minimum cost so registration stays fast under test.
pub fn fast_credentials() -> Arc<Argon2Credentials> {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("valid argon2 params");
    Arc::new(Argon2Credentials::with_params(params))
}

pub fn http_state(store: &Arc<MemoryStore>) -> HttpState {
    let accounts = Arc::new(AccountService::new(
        Arc::clone(store),
        Arc::clone(store),
        fast_credentials(),
    ));
    let blog = Arc::new(BlogService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::new(mockable::DefaultClock),
    ));
    HttpState::new(accounts.clone(), accounts, blog.clone(), blog)
}

/// What a single request produced.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub struct Browser {
    pub store: Arc<MemoryStore>,
    key: Key,
    pub cookie: Option<Cookie<'static>>,
}

impl Default for Browser {
    fn default() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            key: Key::generate(),
            cookie: None,
        }
    }
}

impl Browser {
    pub async fn get(&mut self, uri: &str) -> Reply {
        self.send(TestRequest::get().uri(uri)).await
    }

    pub async fn post_form(&mut self, uri: &str, form: impl Serialize) -> Reply {
        self.send(TestRequest::post().uri(uri).set_form(form)).await
    }

    pub async fn register(&mut self, name: &str, email: &str) -> Reply {
        self.post_form(
            "/register",
            [("name", name), ("email", email), ("password", "correct horse")],
        )
        .await
    }

    pub async fn publish(&mut self, title: &str) -> Reply {
        self.post_form(
            "/new-post",
            [
                ("title", title),
                ("subtitle", "A subtitle"),
                ("img_url", "https://example.com/cover.png"),
                ("body", "<p>Body</p>"),
            ],
        )
        .await
    }

    async fn send(&mut self, request: TestRequest) -> Reply {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".into())
            .cookie_secure(false)
            .cookie_content_security(CookieContentSecurity::Private)
            .build();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(http_state(&self.store)))
                .service(web::scope("").wrap(session).configure(configure))
                .wrap(Trace),
        )
        .await;

        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = test::call_service(&app, request.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = Some(cookie.into_owned());
        }
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = test::read_body(res).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Reply {
            status,
            location,
            body,
        }
    }
}
