//! Startup seeding orchestration.

use thiserror::Error;
use tracing::info;

use super::roster::roster_records;
use crate::domain::RecordValidationError;
use crate::domain::ports::{DirectoryRepository, DirectoryRepositoryError};

/// Errors returned while seeding the directory.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// A roster entry failed validation.
    #[error("example roster is invalid: {0}")]
    Roster(#[from] RecordValidationError),
    /// The record store rejected a read or write.
    #[error("directory seeding failed: {0}")]
    Store(#[from] DirectoryRepositoryError),
}

/// What startup seeding did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Seeding is switched off.
    Disabled,
    /// The store already held records; nothing was written.
    AlreadyPopulated { existing: usize },
    /// The roster was inserted.
    Applied { inserted: usize },
}

/// Insert the example roster when `enabled` and the store is empty.
///
/// # Examples
/// ```
/// use directory_backend::example_data::{SeedOutcome, seed_directory_on_startup};
/// use directory_backend::outbound::memory::InMemoryDirectoryRepository;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = InMemoryDirectoryRepository::new();
/// let outcome = seed_directory_on_startup(&store, true).await.unwrap();
/// assert_eq!(outcome, SeedOutcome::Applied { inserted: 10 });
/// # }
/// ```
pub async fn seed_directory_on_startup(
    store: &dyn DirectoryRepository,
    enabled: bool,
) -> Result<SeedOutcome, StartupSeedingError> {
    if !enabled {
        info!(reason = "disabled", "directory seeding skipped");
        return Ok(SeedOutcome::Disabled);
    }

    let existing = store.list_all().await?.len();
    if existing > 0 {
        info!(existing, "directory already populated; seeding skipped");
        return Ok(SeedOutcome::AlreadyPopulated { existing });
    }

    let records = roster_records()?;
    for record in &records {
        store.insert(record).await?;
    }
    info!(inserted = records.len(), "example roster seeded");
    Ok(SeedOutcome::Applied {
        inserted: records.len(),
    })
}
