//! Port abstraction for directory record stores and their errors.
use async_trait::async_trait;

use crate::domain::{DirectoryRecord, NewDirectoryRecord, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by directory record store adapters.
    pub enum DirectoryRepositoryError {
        /// Another record already uses this email address.
        DuplicateEmail { email: String } => "a record with email {email} already exists",
        /// Store connection could not be established.
        Connection { message: String } => "directory store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "directory store query failed: {message}",
    }
}

/// Append-only record store.
///
/// `insert` is atomic: a rejected insertion leaves no trace in the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Append a record and return its store-assigned identifier.
    async fn insert(
        &self,
        record: &NewDirectoryRecord,
    ) -> Result<RecordId, DirectoryRepositoryError>;

    /// Every record in insertion order.
    async fn list_all(&self) -> Result<Vec<DirectoryRecord>, DirectoryRepositoryError>;
}
