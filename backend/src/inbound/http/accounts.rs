//! Registration, login and logout handlers.
//!
//! ```text
//! GET|POST /register
//! GET|POST /login
//! GET      /logout
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::{ErrorCode, Identity, SessionToken};
use crate::inbound::http::ApiResult;
use crate::inbound::http::extractors::{AuthenticatedUser, CurrentIdentity};
use crate::inbound::http::forms::{FieldErrors, FormValues, LoginForm, RegisterForm};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{NoContent, PageView, see_other};

pub(crate) const EMAIL_TAKEN: &str = "Email already exist, please login instead";
pub(crate) const EMAIL_UNKNOWN: &str = "Email does not exist, please try existing email";
pub(crate) const PASSWORD_WRONG: &str = "password is incorrect, please try again";

fn render_form(
    page: &'static str,
    session: &SessionContext,
    identity: &Identity,
    values: FormValues,
    errors: FieldErrors,
    status: StatusCode,
) -> ApiResult<HttpResponse> {
    let flashes = session.take_flashes()?;
    Ok(PageView::new(page, identity, flashes, NoContent::default())
        .with_form(values, errors)
        .respond(status))
}

/// Swap the cookie over to `token`, closing any session it carried before.
async fn start_session(
    state: &HttpState,
    session: &SessionContext,
    token: SessionToken,
) -> ApiResult<()> {
    if let Some(previous) = session.token()? {
        state.accounts.logout(previous).await?;
    }
    session.persist_token(token)
}

#[get("/register")]
pub async fn register_form(
    session: SessionContext,
    identity: CurrentIdentity,
) -> ApiResult<HttpResponse> {
    render_form(
        "register",
        &session,
        &identity.0,
        RegisterForm::default().values(),
        FieldErrors::default(),
        StatusCode::OK,
    )
}

#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    identity: CurrentIdentity,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => {
            return render_form(
                "register",
                &session,
                &identity.0,
                form.values(),
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };
    match state.accounts.register(&registration).await {
        Ok(account) => {
            start_session(&state, &session, account.token).await?;
            info!(user_id = %account.user.id(), "account registered");
            Ok(see_other("/"))
        }
        Err(error) if matches!(error.code(), ErrorCode::Conflict) => {
            session.push_flash(EMAIL_TAKEN)?;
            Ok(see_other("/login"))
        }
        Err(error) => Err(error),
    }
}

#[get("/login")]
pub async fn login_form(
    session: SessionContext,
    identity: CurrentIdentity,
) -> ApiResult<HttpResponse> {
    render_form(
        "login",
        &session,
        &identity.0,
        LoginForm::default().values(),
        FieldErrors::default(),
        StatusCode::OK,
    )
}

#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    identity: CurrentIdentity,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            return render_form(
                "login",
                &session,
                &identity.0,
                form.values(),
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };
    match state.accounts.login(&credentials).await {
        Ok(account) => {
            start_session(&state, &session, account.token).await?;
            Ok(see_other("/"))
        }
        Err(error) => {
            let flash = match error.code() {
                ErrorCode::NotFound => EMAIL_UNKNOWN,
                ErrorCode::Unauthorized => PASSWORD_WRONG,
                _ => return Err(error),
            };
            session.push_flash(flash)?;
            Ok(see_other("/login"))
        }
    }
}

/// End the current session; the account itself is untouched.
#[get("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
    _user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    if let Some(token) = session.token()? {
        state.accounts.logout(token).await?;
    }
    session.purge();
    Ok(see_other("/"))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
