//! Credential store: the immutable table of known identities and their
//! salted Argon2 secret hashes.
//!
//! Secrets are hashed at provisioning time with a per-secret random salt and
//! verified by re-deriving the hash from the supplied plaintext. Comparison
//! is constant time (delegated to [`PasswordVerifier`]). An unknown handle is
//! verified against a decoy hash so both failure paths do the same work and
//! yield the same [`AuthFailure`].

use std::collections::HashMap;
use std::fmt;

use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::auth::{Handle, Identity};

const SALT_BYTES: usize = 16;

/// Errors raised while provisioning the credential store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The stored hash is not a valid PHC string.
    #[error("malformed secret hash: {message}")]
    MalformedHash { message: String },
    /// Hashing a secret failed.
    #[error("failed to hash secret: {message}")]
    Hashing { message: String },
    /// Two identities share the same handle.
    #[error("duplicate identity handle: {handle}")]
    DuplicateHandle { handle: String },
}

/// Login failure. Carries no detail so callers cannot tell an unknown
/// handle from a wrong secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid credentials")]
pub struct AuthFailure;

/// One-way, salted hash of a secret in PHC string format.
///
/// # Examples
/// ```
/// use directory_backend::domain::SecretHash;
///
/// let hash = SecretHash::derive("adminpass").expect("hash secret");
/// assert!(hash.as_phc().starts_with("$argon2id$"));
/// assert!(hash.matches("adminpass"));
/// assert!(!hash.matches("wrong"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    /// Hash a plaintext secret with a fresh random salt.
    pub fn derive(secret: &str) -> Result<Self, CredentialError> {
        let mut salt_bytes = [0_u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|err| CredentialError::Hashing {
            message: err.to_string(),
        })?;
        let phc = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|err| CredentialError::Hashing {
                message: err.to_string(),
            })?
            .to_string();
        Ok(Self(phc))
    }

    /// Accept a previously provisioned PHC string after checking its shape.
    pub fn parse(phc: impl Into<String>) -> Result<Self, CredentialError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|err| CredentialError::MalformedHash {
            message: err.to_string(),
        })?;
        Ok(Self(phc))
    }

    /// PHC string suitable for configuration files.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }

    /// Re-derive the hash of `secret` and compare in constant time.
    pub fn matches(&self, secret: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash(..)")
    }
}

#[derive(Debug, Clone)]
struct StoredIdentity {
    identity: Identity,
    secret_hash: SecretHash,
}

/// Immutable table of known identities.
///
/// Built once at process start and shared read-only thereafter; no locking
/// is needed.
///
/// # Examples
/// ```
/// use directory_backend::domain::{CredentialStore, Handle, Identity, Role, SecretHash};
///
/// let admin = Identity::new(Handle::new("admin").unwrap(), Role::Admin, "System Administrator");
/// let store = CredentialStore::new([(admin, SecretHash::derive("adminpass").unwrap())]).unwrap();
///
/// assert!(store.verify("admin", "adminpass").is_ok());
/// assert!(store.verify("admin", "nope").is_err());
/// assert!(store.verify("ghost", "adminpass").is_err());
/// ```
#[derive(Debug)]
pub struct CredentialStore {
    identities: HashMap<Handle, StoredIdentity>,
    decoy: SecretHash,
}

impl CredentialStore {
    /// Build the store from provisioned identities.
    pub fn new(
        entries: impl IntoIterator<Item = (Identity, SecretHash)>,
    ) -> Result<Self, CredentialError> {
        let mut identities = HashMap::new();
        for (identity, secret_hash) in entries {
            let handle = identity.handle().clone();
            if identities.contains_key(&handle) {
                return Err(CredentialError::DuplicateHandle {
                    handle: handle.to_string(),
                });
            }
            identities.insert(
                handle,
                StoredIdentity {
                    identity,
                    secret_hash,
                },
            );
        }

        let mut decoy_secret = Zeroizing::new([0_u8; 32]);
        OsRng.fill_bytes(decoy_secret.as_mut_slice());
        let decoy = SecretHash::derive(&hex::encode(decoy_secret.as_slice()))?;

        Ok(Self { identities, decoy })
    }

    /// Check a handle/secret pair.
    ///
    /// Returns the matching [`Identity`] or an [`AuthFailure`] that looks the
    /// same whether the handle was unknown or the secret was wrong.
    pub fn verify(&self, handle: &str, secret: &str) -> Result<Identity, AuthFailure> {
        let Ok(handle) = Handle::new(handle) else {
            self.decoy.matches(secret);
            return Err(AuthFailure);
        };
        match self.identities.get(&handle) {
            Some(stored) if stored.secret_hash.matches(secret) => Ok(stored.identity.clone()),
            Some(_) => Err(AuthFailure),
            None => {
                self.decoy.matches(secret);
                Err(AuthFailure)
            }
        }
    }

    /// Look up a known identity by handle.
    pub fn identity(&self, handle: &Handle) -> Option<&Identity> {
        self.identities.get(handle).map(|stored| &stored.identity)
    }

    /// Number of provisioned identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Whether no identities are provisioned.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for credential verification.
    use super::*;
    use crate::domain::Role;
    use rstest::{fixture, rstest};

    fn identity(handle: &str, role: Role, name: &str) -> Identity {
        Identity::new(Handle::new(handle).expect("handle"), role, name)
    }

    #[fixture]
    fn store() -> CredentialStore {
        CredentialStore::new([
            (
                identity("admin", Role::Admin, "System Administrator"),
                SecretHash::derive("adminpass").expect("hash"),
            ),
            (
                identity("employee", Role::Employee, "John Doe"),
                SecretHash::derive("userpass").expect("hash"),
            ),
        ])
        .expect("store")
    }

    #[rstest]
    #[case("admin", "adminpass", Role::Admin)]
    #[case("employee", "userpass", Role::Employee)]
    #[case("  employee ", "userpass", Role::Employee)]
    fn correct_secret_verifies(
        store: CredentialStore,
        #[case] handle: &str,
        #[case] secret: &str,
        #[case] role: Role,
    ) {
        let identity = store.verify(handle, secret).expect("verification succeeds");
        assert_eq!(identity.role(), role);
        assert_eq!(identity.handle().as_ref(), handle.trim());
    }

    #[rstest]
    #[case("admin", "userpass")]
    #[case("admin", "ADMINPASS")]
    #[case("employee", "")]
    #[case("ghost", "adminpass")]
    #[case("", "adminpass")]
    fn failures_are_indistinguishable(
        store: CredentialStore,
        #[case] handle: &str,
        #[case] secret: &str,
    ) {
        assert_eq!(store.verify(handle, secret), Err(AuthFailure));
    }

    #[rstest]
    fn hashes_are_salted_per_secret() {
        let first = SecretHash::derive("same").expect("hash");
        let second = SecretHash::derive("same").expect("hash");
        assert_ne!(first.as_phc(), second.as_phc());
        assert!(first.matches("same"));
        assert!(second.matches("same"));
    }

    #[rstest]
    fn parse_rejects_non_phc_strings() {
        let err = SecretHash::parse("plaintext").expect_err("must reject");
        assert!(matches!(err, CredentialError::MalformedHash { .. }));
    }

    #[rstest]
    fn parse_accepts_derived_hash() {
        let derived = SecretHash::derive("userpass").expect("hash");
        let parsed = SecretHash::parse(derived.as_phc()).expect("parse");
        assert!(parsed.matches("userpass"));
    }

    #[rstest]
    fn duplicate_handles_are_rejected() {
        let hash = SecretHash::derive("x").expect("hash");
        let err = CredentialStore::new([
            (identity("admin", Role::Admin, "One"), hash.clone()),
            (identity("admin", Role::Employee, "Two"), hash),
        ])
        .expect_err("duplicate handle");
        assert_eq!(
            err,
            CredentialError::DuplicateHandle {
                handle: "admin".to_owned()
            }
        );
    }

    #[rstest]
    fn debug_output_hides_hash() {
        let hash = SecretHash::derive("secret").expect("hash");
        assert_eq!(format!("{hash:?}"), "SecretHash(..)");
    }
}
