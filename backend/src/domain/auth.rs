//! Authentication primitives: login credentials, handles, roles, and the
//! identities they resolve to.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to the directory
//! service.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Handle was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyHandle,
    /// Secret was blank.
    #[error("password must not be empty")]
    EmptySecret,
}

/// Unique login handle of a known identity.
///
/// ## Invariants
/// - Trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Validate and construct a handle.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LoginValidationError> {
        let normalized = raw.as_ref().trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyHandle);
        }
        Ok(Self(normalized.to_owned()))
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl TryFrom<String> for Handle {
    type Error = LoginValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Coarse-grained permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May read and add directory records.
    Admin,
    /// May read directory records.
    Employee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Employee => f.write_str("employee"),
        }
    }
}

/// A known principal.
///
/// The hashed secret is held by the
/// [`CredentialStore`](crate::domain::CredentialStore) alongside this value.
///
/// # Examples
/// ```
/// use directory_backend::domain::{Handle, Identity, Role};
///
/// let handle = Handle::new("admin").expect("valid handle");
/// let identity = Identity::new(handle, Role::Admin, "System Administrator");
/// assert!(identity.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[schema(value_type = String, example = "employee")]
    handle: Handle,
    role: Role,
    #[schema(example = "John Doe")]
    display_name: String,
}

impl Identity {
    /// Build an identity from validated parts.
    pub fn new(handle: Handle, role: Role, display_name: impl Into<String>) -> Self {
        Self {
            handle,
            role,
            display_name: display_name.into(),
        }
    }

    /// Unique login handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Permission level.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Human readable name shown in views.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Whether the identity carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Validated login credentials used by the credential store.
///
/// ## Invariants
/// - `handle` is trimmed and must not be empty after trimming.
/// - `secret` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use directory_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "adminpass").unwrap();
/// assert_eq!(creds.handle(), "admin");
/// assert_eq!(creds.secret(), "adminpass");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    handle: String,
    secret: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw handle/secret inputs.
    pub fn try_from_parts(handle: &str, secret: &str) -> Result<Self, LoginValidationError> {
        let normalized = handle.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyHandle);
        }

        if secret.is_empty() {
            return Err(LoginValidationError::EmptySecret);
        }

        Ok(Self {
            handle: normalized.to_owned(),
            secret: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Handle string suitable for identity lookups.
    pub fn handle(&self) -> &str {
        self.handle.as_str()
    }

    /// Plaintext secret provided by the caller.
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }
}
