//! Server-side session table.
//!
//! A session binds an opaque, unguessable token to an identity handle. The
//! table is the only place sessions are created, looked up, or destroyed and
//! sits behind a single mutex.
//!
//! ```text
//! Unauthenticated --create--> Authenticated --destroy--> Terminated
//! ```
//!
//! `Terminated` is absorbing: resolving a destroyed token behaves exactly like
//! resolving one that never existed. Sessions do not expire.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use mockable::Clock;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::auth::{Handle, Identity};
use super::credentials::CredentialStore;

const TOKEN_BYTES: usize = 32;
const FINGERPRINT_BYTES: usize = 8;

/// Opaque session token: 32 random bytes, hex encoded.
///
/// # Examples
/// ```
/// use directory_backend::domain::SessionToken;
///
/// assert!(SessionToken::parse("not-a-token").is_none());
/// let raw = "ab".repeat(32);
/// assert_eq!(SessionToken::parse(&raw).map(|t| t.as_str().len()), Some(64));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept a token presented by a client if it has the minted shape.
    ///
    /// Malformed input returns `None`, which callers treat as "not
    /// authenticated".
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == TOKEN_BYTES * 2
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(raw.to_owned()))
    }

    /// Raw token string for transport in a cookie.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Truncated SHA-256 of the token, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.fingerprint())
    }
}

/// A live binding between a token and an identity handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: SessionToken,
    identity_handle: Handle,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Token presented by the client.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Handle of the identity the session belongs to.
    pub fn identity_handle(&self) -> &Handle {
        &self.identity_handle
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Mints, resolves, and destroys sessions.
///
/// Safe to share across request handlers: every table access takes the
/// single internal lock for the duration of one map operation.
pub struct SessionManager {
    credentials: Arc<CredentialStore>,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<SessionToken, Session>>,
}

impl SessionManager {
    /// Create an empty session table resolving handles against `credentials`.
    pub fn new(credentials: Arc<CredentialStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    // Each critical section is a single map operation, so a poisoned lock
    // cannot leave the table half-updated.
    fn table(&self) -> MutexGuard<'_, HashMap<SessionToken, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a session for `identity` and return its token.
    ///
    /// Returns `None` when the credential store does not know the identity's
    /// handle, so every live session names a provisioned identity.
    /// Concurrent sessions per identity are unlimited.
    pub fn create(&self, identity: &Identity) -> Option<SessionToken> {
        if self.credentials.identity(identity.handle()).is_none() {
            warn!(handle = %identity.handle(), "refused session for unknown identity");
            return None;
        }
        let token = SessionToken::generate();
        let session = Session {
            token: token.clone(),
            identity_handle: identity.handle().clone(),
            created_at: self.clock.utc(),
        };
        self.table().insert(token.clone(), session);
        info!(
            handle = %identity.handle(),
            session = %token.fingerprint(),
            "session created"
        );
        Some(token)
    }

    /// Resolve a token to the identity it is bound to.
    ///
    /// Unknown and destroyed tokens resolve to `None`.
    pub fn resolve(&self, token: &SessionToken) -> Option<Identity> {
        let handle = self
            .table()
            .get(token)
            .map(|session| session.identity_handle.clone())?;
        self.credentials.identity(&handle).cloned()
    }

    /// Look up the full session record for `token`.
    pub fn session(&self, token: &SessionToken) -> Option<Session> {
        self.table().get(token).cloned()
    }

    /// Terminate a session. Destroying an absent token is a no-op.
    ///
    /// Returns whether a live session was removed.
    pub fn destroy(&self, token: &SessionToken) -> bool {
        let removed = self.table().remove(token).is_some();
        if removed {
            info!(session = %token.fingerprint(), "session destroyed");
        }
        removed
    }

    /// Number of live sessions.
    pub fn active_sessions(&self) -> usize {
        self.table().len()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("active_sessions", &self.active_sessions())
            .finish_non_exhaustive()
    }
}
