//! Creation, renaming and deletion of tracked pets.
//!
//! Every successful write invalidates the owner's cache entry before
//! returning.

use std::collections::HashSet;
use std::sync::Arc;

use bm_core::names::{validate_pet_name, NameRejection};
use bm_core::types::{PlayerId, TrackedPetRecord};
use thiserror::Error;

use crate::cache::PlayerCache;
use crate::config::BeastmasterConfig;
use crate::denylist::Denylist;
use crate::repository::{StoreError, TamedPetRepository};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("Pet tracking is disabled.")]
    TrackingDisabled,
    #[error("You have reached the maximum number of tracked pets.")]
    QuotaReached,
    #[error("This pet is already tracked.")]
    AlreadyTracked,
    #[error("Your new pet could not be recorded.")]
    Store(StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("Usage: .petname rename <newname>")]
    Empty,
    #[error("Invalid or profane pet name. Please try again with .petname rename <newname>.")]
    Invalid(NameRejection),
    #[error("Invalid or profane pet name. Please try again with .petname rename <newname>.")]
    Profane,
    #[error("That pet is no longer tracked.")]
    NotFound,
    #[error("Your pet could not be renamed. Please try again later.")]
    Store(StoreError),
}

/// Trims `raw` and checks it against the name rules and the denylist.
///
/// Leading and trailing whitespace is dropped before validation, the same way
/// chat command arguments are, so `" ab"` is accepted as `"ab"`. Spaces
/// inside the name are kept.
///
/// # Returns
///
/// The trimmed name on success.
pub fn check_name(raw: &str, denylist: Option<&Denylist>) -> Result<String, RenameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RenameError::Empty);
    }
    validate_pet_name(name).map_err(RenameError::Invalid)?;
    if denylist.is_some_and(|list| list.is_profane(name)) {
        return Err(RenameError::Profane);
    }
    Ok(name.to_string())
}

/// Tracked-pet storage together with its per-player cache.
pub struct TrackedPets {
    store: Arc<dyn TamedPetRepository>,
    cache: PlayerCache,
}

impl TrackedPets {
    pub fn new(store: Arc<dyn TamedPetRepository>) -> Self {
        TrackedPets {
            store,
            cache: PlayerCache::new(),
        }
    }

    pub fn cache(&self) -> &PlayerCache {
        &self.cache
    }

    pub fn owned_entries(&self, owner: PlayerId) -> Arc<HashSet<u32>> {
        self.cache.owned_entries(owner, self.store.as_ref())
    }

    pub fn list(&self, owner: PlayerId) -> Arc<Vec<TrackedPetRecord>> {
        self.cache.tracked_list(owner, self.store.as_ref())
    }

    /// Name stored for `(owner, entry)`. Read failures count as absent.
    pub fn stored_name(&self, owner: PlayerId, entry: u32) -> Option<String> {
        match self.store.find(owner, entry) {
            Ok(record) => record.map(|r| r.name),
            Err(e) => {
                log::error!("Beastmaster: Could not read tracked pet {entry} of player {owner}: {e}");
                None
            }
        }
    }

    /// Refuses adoption once the owner is at the configured maximum.
    ///
    /// A failed count does not block adoption.
    pub fn check_quota(&self, config: &BeastmasterConfig, owner: PlayerId) -> Result<(), CreateError> {
        if !config.track_tamed_pets || config.max_tracked_pets == 0 {
            return Ok(());
        }
        let count = self.store.count(owner).unwrap_or_else(|e| {
            log::error!("Beastmaster: Could not count tracked pets of player {owner}: {e}");
            0
        });
        if count >= config.max_tracked_pets {
            return Err(CreateError::QuotaReached);
        }
        Ok(())
    }

    /// Records a freshly adopted pet.
    pub fn create(
        &self,
        config: &BeastmasterConfig,
        owner: PlayerId,
        entry: u32,
        name: &str,
        tamed_at: i64,
    ) -> Result<(), CreateError> {
        if !config.track_tamed_pets {
            return Err(CreateError::TrackingDisabled);
        }
        self.check_quota(config, owner)?;

        let record = TrackedPetRecord::new(owner, entry, name, tamed_at);
        match self.store.insert(&record) {
            Ok(true) => {
                self.cache.invalidate(owner);
                log::info!("Beastmaster: Player {owner} tracked pet {entry} as '{name}'.");
                Ok(())
            }
            Ok(false) => Err(CreateError::AlreadyTracked),
            Err(e) => {
                log::error!("Beastmaster: Could not track pet {entry} of player {owner}: {e}");
                Err(CreateError::Store(e))
            }
        }
    }

    /// Stores `name` for `(owner, entry)`. The name must already be checked.
    pub fn rename(&self, owner: PlayerId, entry: u32, name: &str) -> Result<(), RenameError> {
        match self.store.rename(owner, entry, name) {
            Ok(true) => {
                self.cache.invalidate(owner);
                log::info!("Beastmaster: Player {owner} renamed tracked pet {entry} to '{name}'.");
                Ok(())
            }
            Ok(false) => {
                self.cache.invalidate(owner);
                Err(RenameError::NotFound)
            }
            Err(e) => {
                log::error!("Beastmaster: Could not rename pet {entry} of player {owner}: {e}");
                Err(RenameError::Store(e))
            }
        }
    }

    /// Removes `(owner, entry)`. Returns whether a record was removed.
    pub fn delete(&self, owner: PlayerId, entry: u32) -> Result<bool, StoreError> {
        let removed = self.store.delete(owner, entry).inspect_err(|e| {
            log::error!("Beastmaster: Could not delete pet {entry} of player {owner}: {e}");
        })?;
        self.cache.invalidate(owner);
        if removed {
            log::info!("Beastmaster: Player {owner} deleted tracked pet (entry {entry}).");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn tracking(max: u32) -> BeastmasterConfig {
        BeastmasterConfig {
            track_tamed_pets: true,
            max_tracked_pets: max,
            ..BeastmasterConfig::default()
        }
    }

    fn pets() -> (Arc<InMemoryRepository>, TrackedPets) {
        let repo = Arc::new(InMemoryRepository::new());
        let pets = TrackedPets::new(repo.clone());
        (repo, pets)
    }

    #[test]
    fn create_then_delete_is_visible_through_cache() {
        let (_, pets) = pets();
        let config = tracking(20);
        assert!(pets.owned_entries(1).is_empty());

        pets.create(&config, 1, 100, "Wolf", 10).unwrap();
        assert!(pets.owned_entries(1).contains(&100));

        assert_eq!(pets.delete(1, 100), Ok(true));
        assert!(!pets.owned_entries(1).contains(&100));
        assert_eq!(pets.delete(1, 100), Ok(false));
    }

    #[test]
    fn duplicates_are_rejected() {
        let (repo, pets) = pets();
        let config = tracking(20);
        pets.create(&config, 1, 100, "Wolf", 10).unwrap();
        assert_eq!(
            pets.create(&config, 1, 100, "Wolf", 20),
            Err(CreateError::AlreadyTracked)
        );
        assert_eq!(repo.count(1), Ok(1));
    }

    #[test]
    fn quota_blocks_until_a_delete() {
        let (_, pets) = pets();
        let config = tracking(2);
        pets.create(&config, 1, 100, "A", 1).unwrap();
        pets.create(&config, 1, 101, "B", 2).unwrap();
        assert_eq!(
            pets.create(&config, 1, 102, "C", 3),
            Err(CreateError::QuotaReached)
        );

        pets.delete(1, 100).unwrap();
        assert_eq!(pets.create(&config, 1, 102, "C", 3), Ok(()));
    }

    #[test]
    fn zero_quota_is_unlimited() {
        let (_, pets) = pets();
        let config = tracking(0);
        for entry in 0..50 {
            pets.create(&config, 1, entry, "Pet", entry as i64).unwrap();
        }
        assert_eq!(pets.list(1).len(), 50);
    }

    #[test]
    fn disabled_tracking_records_nothing() {
        let (repo, pets) = pets();
        assert_eq!(
            pets.create(&BeastmasterConfig::default(), 1, 100, "Wolf", 1),
            Err(CreateError::TrackingDisabled)
        );
        assert_eq!(repo.count(1), Ok(0));
    }

    #[test]
    fn failed_writes_are_not_reported_as_success() {
        let (repo, pets) = pets();
        let config = tracking(20);
        pets.create(&config, 1, 100, "Wolf", 1).unwrap();

        repo.set_fail_writes(true);
        assert!(matches!(
            pets.create(&config, 1, 101, "Bear", 2),
            Err(CreateError::Store(_))
        ));
        assert!(matches!(pets.rename(1, 100, "Fang"), Err(RenameError::Store(_))));
        assert!(pets.delete(1, 100).is_err());
        assert_eq!(pets.list(1).len(), 1);
        assert_eq!(pets.list(1)[0].name, "Wolf");
    }

    #[test]
    fn rename_updates_list() {
        let (_, pets) = pets();
        pets.create(&tracking(20), 1, 100, "Wolf", 1).unwrap();
        assert_eq!(pets.list(1)[0].name, "Wolf");

        pets.rename(1, 100, "Fang").unwrap();
        assert_eq!(pets.list(1)[0].name, "Fang");
        assert_eq!(pets.stored_name(1, 100).as_deref(), Some("Fang"));
        assert_eq!(pets.rename(1, 999, "Fang"), Err(RenameError::NotFound));
    }

    #[test]
    fn names_are_checked() {
        assert_eq!(check_name("", None), Err(RenameError::Empty));
        assert_eq!(check_name("   ", None), Err(RenameError::Empty));
        for bad in ["a1b", "a", "Abcdefghijklmnopq", "Fang-"] {
            assert!(matches!(check_name(bad, None), Err(RenameError::Invalid(_))), "{bad:?}");
        }
        for good in ["Fang", "Storm-Claw", "O'Brien"] {
            assert_eq!(check_name(good, None).as_deref(), Ok(good));
        }
        // surrounding whitespace from the chat line is trimmed
        assert_eq!(check_name("  Fang ", None).as_deref(), Ok("Fang"));
        assert_eq!(check_name(" ab", None).as_deref(), Ok("ab"));
        assert!(matches!(check_name(" a", None), Err(RenameError::Invalid(_))));
        assert_eq!(check_name(" Storm Claw ", None).as_deref(), Ok("Storm Claw"));
    }

    #[test]
    fn denylisted_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profanity.txt");
        std::fs::write(&path, "darn\n").unwrap();
        let list = Denylist::new(path);

        assert_eq!(check_name("DarnFang", Some(&list)), Err(RenameError::Profane));
        assert_eq!(check_name("DarnFang", None).as_deref(), Ok("DarnFang"));
    }
}
