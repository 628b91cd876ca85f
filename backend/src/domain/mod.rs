//! Domain primitives, services, and ports.
//!
//! Purpose: Define the personnel directory's strongly typed entities and the
//! operations over them, independent of HTTP and storage. Keep types
//! immutable and document invariants and serialisation contracts (serde) in
//! each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Identity, Role, Handle, LoginCredentials: authentication primitives.
//! - CredentialStore / SecretHash: hashed identity table.
//! - SessionManager / SessionToken: server-side session table.
//! - authorize / allow: the authorization gate.
//! - DirectoryRecord, NewDirectoryRecord, SearchQuery, search: records and
//!   substring search.
//! - DirectoryService: login, logout, whoami, list and add operations.

pub mod auth;
pub mod authorization;
pub mod credentials;
pub mod directory;
pub mod directory_service;
pub mod error;
pub mod ports;
pub mod session;

pub use self::auth::{Handle, Identity, LoginCredentials, LoginValidationError, Role};
pub use self::authorization::{AccessDecision, DenyReason, RequiredRole, allow, authorize};
pub use self::credentials::{AuthFailure, CredentialError, CredentialStore, SecretHash};
pub use self::directory::{
    DirectoryRecord, NewDirectoryRecord, RecordDraft, RecordField, RecordId,
    RecordValidationError, SearchQuery, search,
};
pub use self::directory_service::{
    AddRecordOutcome, DirectoryListing, DirectoryService, LoginOutcome,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::session::{Session, SessionManager, SessionToken};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use directory_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
