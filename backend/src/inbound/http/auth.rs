//! Login, logout, and identity handlers.
//!
//! ```text
//! GET  /           -> 303 /directory or /login
//! GET  /login      -> login view
//! POST /login      -> 303 /directory, or login view with an error
//! GET  /logout     -> 303 /login
//! GET  /whoami     -> identity JSON or 401
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{Error, Identity, LoginCredentials, LoginOutcome};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{LoginPage, RenderedView, View, render_page};
use crate::inbound::http::{ApiResult, see_other};

/// Message shown for any failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login form body for `POST /login`.
#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    /// Login handle.
    #[schema(example = "employee")]
    pub username: String,
    /// Plaintext secret.
    #[schema(example = "userpass")]
    pub password: String,
}

/// Send the caller to the directory or the login page.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 303, description = "Redirect to /directory or /login")),
    tags = ["auth"],
    operation_id = "root"
)]
#[get("/")]
pub async fn root(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let token = session.token()?;
    let target = match state.directory.whoami(token.as_ref()) {
        Some(_) => "/directory",
        None => "/login",
    };
    Ok(see_other(target))
}

/// Render the login page.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login view", body = RenderedView)),
    tags = ["auth"],
    operation_id = "loginPage"
)]
#[get("/login")]
pub async fn login_page(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    render_page(
        state.views.as_ref(),
        View::Login,
        &LoginPage { error: None },
        StatusCode::OK,
    )
}

/// Verify credentials and open a session.
///
/// Any previous session carried by the cookie is ended first.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank username or password", body = RenderedView),
        (status = 401, description = "Invalid credentials", body = RenderedView),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let LoginForm { username, password } = form.into_inner();
    let password = Zeroizing::new(password);

    let credentials = match LoginCredentials::try_from_parts(&username, &password) {
        Ok(credentials) => credentials,
        Err(err) => {
            let page = LoginPage {
                error: Some(err.to_string()),
            };
            return render_page(
                state.views.as_ref(),
                View::Login,
                &page,
                StatusCode::BAD_REQUEST,
            );
        }
    };

    match state.directory.login(&credentials) {
        LoginOutcome::Authenticated { token, identity } => {
            if let Some(previous) = session.token()? {
                state.directory.logout(&previous);
            }
            session.persist_token(&token)?;
            info!(handle = %identity.handle(), "login succeeded");
            Ok(see_other("/directory"))
        }
        LoginOutcome::InvalidCredentials => {
            let page = LoginPage {
                error: Some(INVALID_CREDENTIALS.to_owned()),
            };
            render_page(
                state.views.as_ref(),
                View::Login,
                &page,
                StatusCode::UNAUTHORIZED,
            )
        }
    }
}

/// End the session and clear the cookie.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 303, description = "Logged out; redirect to /login")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[get("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(token) = session.token()? {
        state.directory.logout(&token);
    }
    session.purge();
    Ok(see_other("/login"))
}

/// Identity bound to the caller's session.
#[utoipa::path(
    get,
    path = "/whoami",
    responses(
        (status = 200, description = "Current identity", body = Identity),
        (status = 401, description = "Not logged in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "whoami"
)]
#[get("/whoami")]
pub async fn whoami(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Identity>> {
    let token = session.token()?;
    state
        .directory
        .whoami(token.as_ref())
        .map(web::Json)
        .ok_or_else(|| Error::unauthorized("login required"))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
