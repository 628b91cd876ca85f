//! Service settings loaded via OrthoConfig.
//!
//! Values come from `DIRECTORY_*` environment variables, configuration
//! files, or command-line flags, in the precedence OrthoConfig applies.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Top-level settings for the directory service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DIRECTORY")]
pub struct DirectorySettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// JSON file describing the provisioned identities.
    pub identities_path: Option<PathBuf>,
    /// Leave an empty record store empty at startup.
    #[ortho_config(default = false)]
    pub skip_seed: bool,
}

impl DirectorySettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Whether the example roster should be loaded into an empty store.
    pub fn seed_enabled(&self) -> bool {
        !self.skip_seed
    }
}
