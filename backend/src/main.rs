//! Directory service entry-point: loads configuration, provisions
//! identities, seeds the record store, and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use directory_backend::config::{
    BuildMode, DirectorySettings, provision_identities, session_settings_from_env,
};
use directory_backend::domain::{DirectoryService, SessionManager};
use directory_backend::example_data::seed_directory_on_startup;
use directory_backend::inbound::http::health::HealthState;
use directory_backend::inbound::http::state::HttpState;
use directory_backend::outbound::memory::InMemoryDirectoryRepository;
use server::{ServerConfig, create_server, drain_on_interrupt};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DirectorySettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let mode = BuildMode::from_debug_assertions();

    let credentials = provision_identities(settings.identities_path.as_deref(), mode)
        .map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), mode)
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;

    let store = Arc::new(InMemoryDirectoryRepository::new());
    let seeded = seed_directory_on_startup(store.as_ref(), settings.seed_enabled())
        .await
        .map_err(std::io::Error::other)?;
    info!(outcome = ?seeded, "directory store ready");

    let credentials = Arc::new(credentials);
    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&credentials),
        Arc::new(DefaultClock),
    ));
    let directory = Arc::new(DirectoryService::new(credentials, sessions, store));
    let http_state = HttpState::with_json_views(directory);

    let config = ServerConfig::new(session, bind_addr);
    info!(addr = %config.bind_addr(), "starting directory service");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, config)?;
    drain_on_interrupt(server.handle(), health_state);
    server.await
}
