//! Identity configuration: the file that provisions the credential store.
//!
//! The file is a JSON object keyed by login handle:
//!
//! ```json
//! {
//!   "admin": {
//!     "secretHash": "$argon2id$v=19$m=19456,t=2,p=1$...",
//!     "role": "admin",
//!     "displayName": "System Administrator"
//!   }
//! }
//! ```
//!
//! Hashes are produced with the `hash-secret` binary. The file is read once
//! at startup; the resulting [`CredentialStore`] never changes afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::BuildMode;
use crate::domain::{CredentialError, CredentialStore, Handle, Identity, Role, SecretHash};

/// Errors raised while provisioning identities.
#[derive(Debug, Error)]
pub enum IdentityConfigError {
    /// The identity file could not be read.
    #[error("failed to read identity file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The identity file is not valid JSON of the expected shape.
    #[error("failed to parse identity file: {0}")]
    Parse(#[from] serde_json::Error),
    /// A handle in the file is blank.
    #[error("identity handles must not be blank")]
    BlankHandle,
    /// The file names no identities.
    #[error("identity file defines no identities")]
    Empty,
    /// Hash parsing or store construction failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// Release builds need an explicit identity file.
    #[error("no identity file configured; set DIRECTORY_IDENTITIES_PATH")]
    NotConfigured,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct IdentityEntry {
    secret_hash: String,
    role: Role,
    display_name: String,
}

/// Build a credential store from the JSON identity document.
///
/// # Examples
/// ```
/// use directory_backend::config::parse_identities;
/// use directory_backend::domain::SecretHash;
///
/// let hash = SecretHash::derive("userpass").unwrap();
/// let json = format!(
///     r#"{{"employee": {{"secretHash": "{}", "role": "employee", "displayName": "John Doe"}}}}"#,
///     hash.as_phc()
/// );
/// let store = parse_identities(&json).unwrap();
/// assert!(store.verify("employee", "userpass").is_ok());
/// ```
pub fn parse_identities(json: &str) -> Result<CredentialStore, IdentityConfigError> {
    let entries: BTreeMap<String, IdentityEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(IdentityConfigError::Empty);
    }

    let mut identities = Vec::with_capacity(entries.len());
    for (handle, entry) in entries {
        let handle = Handle::new(&handle).map_err(|_| IdentityConfigError::BlankHandle)?;
        let secret_hash = SecretHash::parse(entry.secret_hash)?;
        identities.push((
            Identity::new(handle, entry.role, entry.display_name),
            secret_hash,
        ));
    }
    Ok(CredentialStore::new(identities)?)
}

/// Read the identity file at `path` and build the credential store.
pub fn load_identities(path: &Path) -> Result<CredentialStore, IdentityConfigError> {
    let read_error = |source| IdentityConfigError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "identity path must name a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;

    let store = parse_identities(&contents)?;
    info!(path = %path.display(), identities = store.len(), "identity file loaded");
    Ok(store)
}

/// Built-in identities for local development.
///
/// `admin`/`adminpass` (admin) and `employee`/`userpass` (employee), hashed
/// afresh at every start.
pub fn development_identities() -> Result<CredentialStore, CredentialError> {
    let dev = [
        ("admin", "adminpass", Role::Admin, "System Administrator"),
        ("employee", "userpass", Role::Employee, "John Doe"),
    ];
    let mut identities = Vec::with_capacity(dev.len());
    for (handle, secret, role, display_name) in dev {
        let handle = Handle::new(handle).map_err(|err| CredentialError::Hashing {
            message: err.to_string(),
        })?;
        identities.push((
            Identity::new(handle, role, display_name),
            SecretHash::derive(secret)?,
        ));
    }
    CredentialStore::new(identities)
}

/// Provision the credential store for this process.
///
/// A configured file always wins. Without one, debug builds fall back to
/// [`development_identities`] and release builds refuse to start.
pub fn provision_identities(
    path: Option<&Path>,
    mode: BuildMode,
) -> Result<CredentialStore, IdentityConfigError> {
    match (path, mode) {
        (Some(path), _) => load_identities(path),
        (None, BuildMode::Debug) => {
            warn!("no identity file configured; using development identities");
            Ok(development_identities()?)
        }
        (None, BuildMode::Release) => Err(IdentityConfigError::NotConfigured),
    }
}
