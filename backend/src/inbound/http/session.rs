//! Cookie transport for session tokens.
//!
//! The cookie carries only the opaque [`SessionToken`]; the binding to an
//! identity lives in the server-side session table. Handlers use
//! [`SessionContext`] and never touch Actix session keys directly.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionToken};

pub(crate) const SESSION_TOKEN_KEY: &str = "session_token";

/// Wrapper exposing token-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `token` in the session cookie.
    pub fn persist_token(&self, token: &SessionToken) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(SESSION_TOKEN_KEY, token.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Token presented by the client, if the cookie holds a well-formed one.
    ///
    /// A malformed value is treated as absent.
    pub fn token(&self) -> Result<Option<SessionToken>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| {
            let token = SessionToken::parse(&raw);
            if token.is_none() {
                warn!("malformed session token in cookie");
            }
            token
        }))
    }

    /// Drop everything the cookie holds.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{SESSION_COOKIE, test_session_middleware};
    use actix_web::{App, HttpResponse, test, web};

    const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn token_body(session: &SessionContext) -> Result<HttpResponse, Error> {
        let token = session.token()?;
        Ok(HttpResponse::Ok().body(token.map(|t| t.as_str().to_owned()).unwrap_or_default()))
    }

    #[actix_web::test]
    async fn round_trips_token() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let token = SessionToken::parse(TOKEN).expect("fixture token");
                        session.persist_token(&token)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move { token_body(&session) }),
                ),
        )
        .await;

        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie")
            .into_owned();

        let get = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(test::read_body(get).await, TOKEN);
    }

    #[actix_web::test]
    async fn malformed_token_reads_as_absent() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/tamper",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(SESSION_TOKEN_KEY, "not-a-token")
                            .expect("insert raw value");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move { token_body(&session) }),
                ),
        )
        .await;

        let tamper =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = tamper
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie")
            .into_owned();

        let get = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert!(test::read_body(get).await.is_empty());
    }
}
