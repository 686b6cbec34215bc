//! Storage seams for the catalog and the tracked-pet table.
//!
//! The server talks to storage only through [`TameSource`] and
//! [`TamedPetRepository`]. [`crate::keydb_store::KeyDbStore`] is the
//! production backend; [`InMemoryRepository`] backs tests and offline runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use bm_core::types::{sort_newest_first, PlayerId, TameRow, TrackedPetRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("corrupt record {key}: {reason}")]
    Decode { key: String, reason: String },
    #[error("table {0} does not exist")]
    MissingTable(&'static str),
}

/// Read access to the `beastmaster_tames` table.
pub trait TameSource: Send + Sync {
    /// Returns every row, ordered by entry.
    fn load_tames(&self) -> Result<Vec<TameRow>, StoreError>;
}

/// The `beastmaster_tamed_pets` table.
pub trait TamedPetRepository: Send + Sync {
    /// Inserts `record` unless `(owner_id, entry)` already exists.
    ///
    /// Returns `Ok(false)` when a record was already present.
    fn insert(&self, record: &TrackedPetRecord) -> Result<bool, StoreError>;

    /// Updates the custom name. Returns `Ok(false)` if no such record.
    fn rename(&self, owner: PlayerId, entry: u32, name: &str) -> Result<bool, StoreError>;

    /// Removes the record. Returns `Ok(false)` if no such record.
    fn delete(&self, owner: PlayerId, entry: u32) -> Result<bool, StoreError>;

    fn count(&self, owner: PlayerId) -> Result<u32, StoreError>;

    /// All records of `owner`, most recently tamed first.
    fn list(&self, owner: PlayerId) -> Result<Vec<TrackedPetRecord>, StoreError>;

    fn find(&self, owner: PlayerId, entry: u32) -> Result<Option<TrackedPetRecord>, StoreError>;
}

/// Process-local storage with the same semantics as the KeyDB backend.
///
/// Read and write failures can be switched on to exercise the fail-open and
/// fail-closed paths.
pub struct InMemoryRepository {
    tames: RwLock<Option<Vec<TameRow>>>,
    tamed: RwLock<HashMap<PlayerId, BTreeMap<u32, TrackedPetRecord>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    list_queries: AtomicUsize,
}

impl InMemoryRepository {
    /// An empty store whose tames table exists but has no rows.
    pub fn new() -> Self {
        InMemoryRepository {
            tames: RwLock::new(Some(Vec::new())),
            tamed: RwLock::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            list_queries: AtomicUsize::new(0),
        }
    }

    pub fn with_tames(rows: Vec<TameRow>) -> Self {
        let repository = Self::new();
        repository.set_tames(Some(rows));
        repository
    }

    /// Replaces the tames table. `None` simulates a missing table.
    pub fn set_tames(&self, rows: Option<Vec<TameRow>>) {
        *self.tames.write().unwrap_or_else(PoisonError::into_inner) = rows;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `list` calls served so far.
    pub fn list_queries(&self) -> usize {
        self.list_queries.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TameSource for InMemoryRepository {
    fn load_tames(&self) -> Result<Vec<TameRow>, StoreError> {
        self.check_read()?;
        let tames = self.tames.read().unwrap_or_else(PoisonError::into_inner);
        let mut rows = tames
            .clone()
            .ok_or(StoreError::MissingTable("beastmaster_tames"))?;
        rows.sort_by_key(|row| row.entry);
        Ok(rows)
    }
}

impl TamedPetRepository for InMemoryRepository {
    fn insert(&self, record: &TrackedPetRecord) -> Result<bool, StoreError> {
        self.check_write()?;
        let mut tamed = self.tamed.write().unwrap_or_else(PoisonError::into_inner);
        let owned = tamed.entry(record.owner_id).or_default();
        if owned.contains_key(&record.entry) {
            return Ok(false);
        }
        owned.insert(record.entry, record.clone());
        Ok(true)
    }

    fn rename(&self, owner: PlayerId, entry: u32, name: &str) -> Result<bool, StoreError> {
        self.check_write()?;
        let mut tamed = self.tamed.write().unwrap_or_else(PoisonError::into_inner);
        match tamed.get_mut(&owner).and_then(|owned| owned.get_mut(&entry)) {
            Some(record) => {
                record.name = name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, owner: PlayerId, entry: u32) -> Result<bool, StoreError> {
        self.check_write()?;
        let mut tamed = self.tamed.write().unwrap_or_else(PoisonError::into_inner);
        Ok(tamed
            .get_mut(&owner)
            .map(|owned| owned.remove(&entry).is_some())
            .unwrap_or(false))
    }

    fn count(&self, owner: PlayerId) -> Result<u32, StoreError> {
        self.check_read()?;
        let tamed = self.tamed.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tamed.get(&owner).map(|owned| owned.len() as u32).unwrap_or(0))
    }

    fn list(&self, owner: PlayerId) -> Result<Vec<TrackedPetRecord>, StoreError> {
        self.check_read()?;
        self.list_queries.fetch_add(1, Ordering::SeqCst);
        let tamed = self.tamed.read().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<TrackedPetRecord> = tamed
            .get(&owner)
            .map(|owned| owned.values().cloned().collect())
            .unwrap_or_default();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn find(&self, owner: PlayerId, entry: u32) -> Result<Option<TrackedPetRecord>, StoreError> {
        self.check_read()?;
        let tamed = self.tamed.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tamed.get(&owner).and_then(|owned| owned.get(&entry)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_rejected_for_existing_key() {
        let repo = InMemoryRepository::new();
        let record = TrackedPetRecord::new(1, 100, "Fang", 10);
        assert_eq!(repo.insert(&record), Ok(true));
        assert_eq!(repo.insert(&record), Ok(false));
        assert_eq!(repo.count(1), Ok(1));
    }

    #[test]
    fn list_is_scoped_to_owner_and_newest_first() {
        let repo = InMemoryRepository::new();
        repo.insert(&TrackedPetRecord::new(1, 100, "First", 10)).unwrap();
        repo.insert(&TrackedPetRecord::new(1, 200, "Second", 20)).unwrap();
        repo.insert(&TrackedPetRecord::new(2, 300, "Other", 30)).unwrap();

        let names: Vec<String> = repo.list(1).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(repo.count(2), Ok(1));
    }

    #[test]
    fn rename_and_delete_report_missing_rows() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.rename(1, 100, "Fang"), Ok(false));
        assert_eq!(repo.delete(1, 100), Ok(false));

        repo.insert(&TrackedPetRecord::new(1, 100, "Fang", 10)).unwrap();
        assert_eq!(repo.rename(1, 100, "Storm"), Ok(true));
        assert_eq!(repo.find(1, 100).unwrap().unwrap().name, "Storm");
        assert_eq!(repo.delete(1, 100), Ok(true));
        assert_eq!(repo.find(1, 100), Ok(None));
    }

    #[test]
    fn missing_tames_table_is_reported() {
        let repo = InMemoryRepository::new();
        repo.set_tames(None);
        assert_eq!(
            repo.load_tames(),
            Err(StoreError::MissingTable("beastmaster_tames"))
        );
    }

    #[test]
    fn fault_injection_blocks_reads_and_writes_separately() {
        let repo = InMemoryRepository::new();
        repo.set_fail_writes(true);
        assert!(repo.insert(&TrackedPetRecord::new(1, 100, "Fang", 10)).is_err());
        assert_eq!(repo.count(1), Ok(0));

        repo.set_fail_writes(false);
        repo.set_fail_reads(true);
        assert!(repo.list(1).is_err());
        assert_eq!(repo.insert(&TrackedPetRecord::new(1, 100, "Fang", 10)), Ok(true));
    }
}
