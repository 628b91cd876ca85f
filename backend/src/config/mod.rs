//! Process configuration: service settings, session cookie settings, and
//! the identity file that provisions the credential store.

mod identities;
mod session;
mod settings;

pub use identities::{
    IdentityConfigError, development_identities, load_identities, parse_identities,
    provision_identities,
};
pub use session::{
    BuildMode, SESSION_KEY_MIN_LEN, SessionConfigError, SessionSettings, key_fingerprint,
    session_settings_from_env,
};
pub use settings::DirectorySettings;
