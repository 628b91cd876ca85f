//! Directory service: the boundary operations of the personnel directory.
//!
//! Every protected operation passes through [`DirectoryService::check_access`]
//! before it reaches the record store. Denials, failed logins, and duplicate
//! emails are ordinary outcomes; only store failures surface as [`Error`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{DirectoryRepository, DirectoryRepositoryError};
use crate::domain::{
    AccessDecision, CredentialStore, DenyReason, DirectoryRecord, Error, Identity,
    LoginCredentials, NewDirectoryRecord, RecordDraft, RecordId, RecordValidationError,
    RequiredRole, SearchQuery, SessionManager, SessionToken, authorize, search,
};

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A new session was opened.
    Authenticated {
        token: SessionToken,
        identity: Identity,
    },
    /// Handle or secret did not match. Which one is not disclosed.
    InvalidCredentials,
}

/// Result of listing the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryListing {
    /// Matching records in store order, with the identity that asked.
    Records {
        viewer: Identity,
        records: Vec<DirectoryRecord>,
    },
    /// The caller must log in first.
    LoginRequired,
}

/// Result of an attempt to add a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRecordOutcome {
    /// Record stored under the returned id.
    Created(RecordId),
    /// The caller must log in first.
    LoginRequired,
    /// The caller is not an admin. The store was not touched.
    Forbidden,
    /// Submitted fields failed validation.
    Invalid {
        admin: Identity,
        error: RecordValidationError,
    },
    /// Another record already uses this email. Nothing was written.
    Duplicate { admin: Identity, email: String },
}

/// Directory operations over the credential store, session table, and
/// record store.
#[derive(Clone)]
pub struct DirectoryService {
    credentials: Arc<CredentialStore>,
    sessions: Arc<SessionManager>,
    records: Arc<dyn DirectoryRepository>,
}

impl DirectoryService {
    /// Wire the service to its collaborators.
    pub fn new(
        credentials: Arc<CredentialStore>,
        sessions: Arc<SessionManager>,
        records: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self {
            credentials,
            sessions,
            records,
        }
    }

    fn map_repository_error(error: DirectoryRepositoryError) -> Error {
        match error {
            DirectoryRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("directory store unavailable: {message}"))
            }
            DirectoryRepositoryError::Query { message } => {
                Error::internal(format!("directory store error: {message}"))
            }
            DirectoryRepositoryError::DuplicateEmail { email } => {
                Error::conflict(format!("a record with email {email} already exists"))
            }
        }
    }

    /// Verify credentials and open a session on success.
    pub fn login(&self, credentials: &LoginCredentials) -> LoginOutcome {
        match self
            .credentials
            .verify(credentials.handle(), credentials.secret())
        {
            Ok(identity) => match self.sessions.create(&identity) {
                Some(token) => LoginOutcome::Authenticated { token, identity },
                None => LoginOutcome::InvalidCredentials,
            },
            Err(_) => {
                info!("login rejected");
                LoginOutcome::InvalidCredentials
            }
        }
    }

    /// End the session behind `token`. Unknown tokens are ignored.
    pub fn logout(&self, token: &SessionToken) {
        self.sessions.destroy(token);
    }

    /// Identity bound to `token`, if any.
    pub fn whoami(&self, token: Option<&SessionToken>) -> Option<Identity> {
        token.and_then(|token| self.sessions.resolve(token))
    }

    /// The single access check run before every protected operation.
    pub fn check_access(
        &self,
        token: Option<&SessionToken>,
        required: RequiredRole,
    ) -> Result<Identity, DenyReason> {
        let identity = self.whoami(token);
        match authorize(identity.as_ref(), required) {
            AccessDecision::Allow(identity) => Ok(identity.clone()),
            AccessDecision::Deny(reason) => {
                if reason == DenyReason::Forbidden {
                    warn!(?required, "access denied");
                }
                Err(reason)
            }
        }
    }

    /// Records matching `query`, for any authenticated caller.
    pub async fn list_directory(
        &self,
        token: Option<&SessionToken>,
        query: &SearchQuery,
    ) -> Result<DirectoryListing, Error> {
        let Ok(viewer) = self.check_access(token, RequiredRole::AnyAuthenticated) else {
            return Ok(DirectoryListing::LoginRequired);
        };
        let all = self
            .records
            .list_all()
            .await
            .map_err(Self::map_repository_error)?;
        let records = search(&all, query);
        Ok(DirectoryListing::Records { viewer, records })
    }

    /// Validate and store a new record. Admin only.
    ///
    /// Authorization runs before validation so a non-admin learns nothing
    /// about the submitted fields.
    pub async fn add_record(
        &self,
        token: Option<&SessionToken>,
        draft: RecordDraft,
    ) -> Result<AddRecordOutcome, Error> {
        let admin = match self.check_access(token, RequiredRole::Admin) {
            Ok(identity) => identity,
            Err(DenyReason::Unauthenticated) => return Ok(AddRecordOutcome::LoginRequired),
            Err(DenyReason::Forbidden) => return Ok(AddRecordOutcome::Forbidden),
        };

        let record = match NewDirectoryRecord::try_from(draft) {
            Ok(record) => record,
            Err(error) => return Ok(AddRecordOutcome::Invalid { admin, error }),
        };

        match self.records.insert(&record).await {
            Ok(id) => {
                info!(%id, handle = %admin.handle(), "directory record added");
                Ok(AddRecordOutcome::Created(id))
            }
            Err(DirectoryRepositoryError::DuplicateEmail { email }) => {
                info!(handle = %admin.handle(), "duplicate directory email rejected");
                Ok(AddRecordOutcome::Duplicate { admin, email })
            }
            Err(err) => Err(Self::map_repository_error(err)),
        }
    }
}

#[cfg(test)]
#[path = "directory_service_tests.rs"]
mod tests;
