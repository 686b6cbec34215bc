//! Per-player memo of tracked-pet queries.
//!
//! Entries live until [`PlayerCache::invalidate`] is called for the player;
//! there is no expiry. Every write to a player's tracked pets must be
//! followed by an invalidation before the next read.
//!
//! Population is last-write-wins: two sessions filling the same player's
//! entry at once both query the store outside the lock and the later insert
//! is kept. A query that started before a write and finishes after the
//! write's invalidation can therefore leave a stale entry behind until the
//! next invalidation.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use bm_core::types::{PlayerId, TrackedPetRecord};

use crate::repository::TamedPetRepository;

#[derive(Debug, Default, Clone)]
struct CacheEntry {
    owned: Option<Arc<HashSet<u32>>>,
    tracked: Option<Arc<Vec<TrackedPetRecord>>>,
}

#[derive(Default)]
pub struct PlayerCache {
    entries: RwLock<HashMap<PlayerId, CacheEntry>>,
}

impl PlayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of every pet `player` has tracked.
    ///
    /// Store failures yield an empty set that is not cached.
    pub fn owned_entries(
        &self,
        player: PlayerId,
        store: &dyn TamedPetRepository,
    ) -> Arc<HashSet<u32>> {
        let cached = self.read(player);
        if let Some(owned) = cached.owned {
            return owned;
        }

        let tracked = match cached.tracked {
            Some(tracked) => tracked,
            None => match self.fetch(player, store) {
                Some(tracked) => tracked,
                None => return Arc::new(HashSet::new()),
            },
        };

        let owned: Arc<HashSet<u32>> = Arc::new(tracked.iter().map(|r| r.entry).collect());
        self.update(player, |entry| entry.owned = Some(Arc::clone(&owned)));
        owned
    }

    /// Tracked pets of `player`, most recently tamed first.
    ///
    /// Store failures yield an empty list that is not cached.
    pub fn tracked_list(
        &self,
        player: PlayerId,
        store: &dyn TamedPetRepository,
    ) -> Arc<Vec<TrackedPetRecord>> {
        if let Some(tracked) = self.read(player).tracked {
            return tracked;
        }
        self.fetch(player, store)
            .unwrap_or_else(|| Arc::new(Vec::new()))
    }

    /// Drops everything cached for `player`.
    pub fn invalidate(&self, player: PlayerId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&player);
    }

    pub fn is_cached(&self, player: PlayerId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&player)
    }

    fn read(&self, player: PlayerId) -> CacheEntry {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&player)
            .cloned()
            .unwrap_or_default()
    }

    fn update(&self, player: PlayerId, apply: impl FnOnce(&mut CacheEntry)) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        apply(entries.entry(player).or_default());
    }

    /// Queries the store without holding the lock, then caches the result.
    fn fetch(
        &self,
        player: PlayerId,
        store: &dyn TamedPetRepository,
    ) -> Option<Arc<Vec<TrackedPetRecord>>> {
        match store.list(player) {
            Ok(records) => {
                let tracked = Arc::new(records);
                self.update(player, |entry| entry.tracked = Some(Arc::clone(&tracked)));
                Some(tracked)
            }
            Err(e) => {
                log::error!("Beastmaster: Could not load tracked pets of player {player}: {e}");
                None
            }
        }
    }
}
