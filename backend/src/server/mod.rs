//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_session::{SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use directory_backend::Trace;
use directory_backend::inbound::http::configure;
use directory_backend::inbound::http::health::{
    HealthState, fail_liveness_on, health, live, ready,
};
use tracing::warn;
use directory_backend::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    // Browser-session cookie: sessions end server-side on logout, never by TTL.
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .build();

    let pages = web::scope("").wrap(session).configure(configure);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(health)
        .service(ready)
        .service(live)
        .service(pages)
}

/// Construct an Actix HTTP server over `http_state`.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// On Ctrl-C, fail liveness probes and stop the server gracefully.
pub fn drain_on_interrupt(handle: ServerHandle, health_state: web::Data<HealthState>) {
    actix_web::rt::spawn(async move {
        fail_liveness_on(health_state, async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed to listen for interrupt");
                std::future::pending::<()>().await;
            }
        })
        .await;
        warn!("interrupt received; draining");
        handle.stop(true).await;
    });
}
