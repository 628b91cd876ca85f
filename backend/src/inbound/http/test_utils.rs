//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::config::development_identities;
use crate::domain::{DirectoryService, SessionManager};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryDirectoryRepository;

/// Cookie name used by [`test_session_middleware`].
pub const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key and the `Secure` flag off so plain
/// HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over the development identities and `store`.
pub fn test_state(store: Arc<InMemoryDirectoryRepository>) -> HttpState {
    let credentials = Arc::new(development_identities().expect("development identities"));
    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&credentials),
        Arc::new(DefaultClock),
    ));
    HttpState::with_json_views(Arc::new(DirectoryService::new(credentials, sessions, store)))
}
