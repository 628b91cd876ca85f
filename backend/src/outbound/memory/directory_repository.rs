//! In-memory implementation of the directory record store.
//!
//! Records live in a vector behind one `RwLock`. Uniqueness is checked and
//! the record appended under the same write guard, so a rejected insert
//! never leaves partial state and readers never see a torn record.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{DirectoryRepository, DirectoryRepositoryError};
use crate::domain::{DirectoryRecord, NewDirectoryRecord, RecordId};

#[derive(Debug, Default)]
struct Table {
    records: Vec<DirectoryRecord>,
    last_id: u64,
}

/// Append-only record store held in process memory.
///
/// Identifiers start at 1 and increase by one per stored record. Emails
/// must be unique; comparison is exact.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryRepository {
    table: RwLock<Table>,
}

impl InMemoryDirectoryRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectoryRepository {
    async fn insert(
        &self,
        record: &NewDirectoryRecord,
    ) -> Result<RecordId, DirectoryRepositoryError> {
        let mut table = self.table.write().map_err(|_| {
            DirectoryRepositoryError::query("directory table lock poisoned")
        })?;

        if table
            .records
            .iter()
            .any(|existing| existing.email() == record.email())
        {
            return Err(DirectoryRepositoryError::duplicate_email(record.email()));
        }

        let id = RecordId::new(table.last_id + 1);
        table.last_id = id.get();
        table.records.push(record.clone().into_record(id));
        debug!(%id, "stored directory record");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<DirectoryRecord>, DirectoryRepositoryError> {
        let table = self.table.read().map_err(|_| {
            DirectoryRepositoryError::query("directory table lock poisoned")
        })?;
        Ok(table.records.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory store.
    use std::sync::Arc;

    use super::*;
    use crate::domain::RecordDraft;
    use rstest::rstest;

    fn new_record(name: &str, email: &str) -> NewDirectoryRecord {
        NewDirectoryRecord::try_from(RecordDraft {
            name: name.to_owned(),
            department: "Engineering".to_owned(),
            email: email.to_owned(),
            phone: "555-0100".to_owned(),
            job_title: "Engineer".to_owned(),
        })
        .expect("valid record")
    }

    #[rstest]
    #[tokio::test]
    async fn ids_start_at_one_and_order_is_kept() {
        let repo = InMemoryDirectoryRepository::new();
        let first = repo
            .insert(&new_record("Alice", "alice@company.com"))
            .await
            .expect("insert");
        let second = repo
            .insert(&new_record("Bob", "bob@company.com"))
            .await
            .expect("insert");
        assert_eq!((first.get(), second.get()), (1, 2));

        let names: Vec<_> = repo
            .list_all()
            .await
            .expect("list")
            .iter()
            .map(|r| r.name().to_owned())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_leaves_store_unchanged() {
        let repo = InMemoryDirectoryRepository::new();
        repo.insert(&new_record("Alice", "alice@company.com"))
            .await
            .expect("insert");

        let err = repo
            .insert(&new_record("Imposter", "alice@company.com"))
            .await
            .expect_err("duplicate");
        assert_eq!(
            err,
            DirectoryRepositoryError::duplicate_email("alice@company.com")
        );
        assert_eq!(repo.len(), 1);

        let next = repo
            .insert(&new_record("Bob", "bob@company.com"))
            .await
            .expect("insert");
        assert_eq!(next.get(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn email_comparison_is_case_sensitive() {
        let repo = InMemoryDirectoryRepository::new();
        repo.insert(&new_record("Alice", "alice@company.com"))
            .await
            .expect("insert");

        let id = repo
            .insert(&new_record("Alice Again", "Alice@company.com"))
            .await
            .expect("differently cased email is a new record");
        assert_eq!(id.get(), 2);
        assert_eq!(repo.len(), 2);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_see_whole_prefixes_during_inserts() {
        const WRITES: u64 = 64;
        let repo = Arc::new(InMemoryDirectoryRepository::new());

        let writer = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                for n in 1..=WRITES {
                    let record =
                        new_record(&format!("Worker {n}"), &format!("w{n}@company.com"));
                    repo.insert(&record).await.expect("insert");
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    let mut seen = 0;
                    while seen < WRITES as usize {
                        let snapshot = repo.list_all().await.expect("list");
                        assert!(snapshot.len() >= seen, "snapshot shrank");
                        for (idx, record) in snapshot.iter().enumerate() {
                            let n = idx as u64 + 1;
                            assert_eq!(record.id().get(), n);
                            assert_eq!(record.name(), format!("Worker {n}"));
                            assert_eq!(record.email(), format!("w{n}@company.com"));
                            assert_eq!(record.department(), "Engineering");
                            assert_eq!(record.phone(), "555-0100");
                            assert_eq!(record.job_title(), "Engineer");
                        }
                        seen = snapshot.len();
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.expect("writer");
        for reader in readers {
            reader.await.expect("reader");
        }
        assert_eq!(repo.len(), WRITES as usize);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let repo = Arc::new(InMemoryDirectoryRepository::new());
        let tasks: Vec<_> = (0..8)
            .map(|n| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.insert(&new_record("Worker", &format!("w{n}@company.com")))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.expect("join").expect("insert").get());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[rstest]
    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let repo = InMemoryDirectoryRepository::new();
        assert!(repo.is_empty());
        assert!(repo.list_all().await.expect("list").is_empty());
    }
}
