//! The adoptable-pet catalog.
//!
//! A [`Catalog`] is an immutable snapshot built from every row of the tames
//! table. Reloads build a fresh snapshot and swap it in, so readers never see
//! a half-built catalog.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use bm_core::action::Action;
use bm_core::types::{Category, PetDefinition, Rarity, TameRow};
use thiserror::Error;

use crate::repository::{StoreError, TameSource};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Could not load tames from beastmaster_tames table!")]
    TableMissing,
    #[error("No pets loaded! Check beastmaster_tames table/import.")]
    Empty,
    #[error("pet catalog unavailable: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LoadError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingTable(_) => LoadError::TableMissing,
            other => LoadError::Store(other),
        }
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    normal: Vec<Arc<PetDefinition>>,
    exotic: Vec<Arc<PetDefinition>>,
    rare: Vec<Arc<PetDefinition>>,
    rare_exotic: Vec<Arc<PetDefinition>>,
    by_entry: HashMap<u32, Arc<PetDefinition>>,
}

impl Catalog {
    /// Partitions `rows`, in order, into the four browse categories.
    ///
    /// # Arguments
    ///
    /// * `rare` - entries forced into the rare category
    /// * `rare_exotic` - entries forced into the rare exotic category, unless
    ///   they are also listed in `rare`
    pub fn build(rows: Vec<TameRow>, rare: &BTreeSet<u32>, rare_exotic: &BTreeSet<u32>) -> Self {
        let mut catalog = Catalog::default();

        for row in rows {
            let definition = Arc::new(PetDefinition::from_row(row));
            let bucket = if rare.contains(&definition.entry) {
                &mut catalog.rare
            } else if rare_exotic.contains(&definition.entry) {
                &mut catalog.rare_exotic
            } else if definition.rarity == Rarity::Exotic {
                &mut catalog.exotic
            } else {
                &mut catalog.normal
            };
            bucket.push(Arc::clone(&definition));
            catalog.by_entry.insert(definition.entry, definition);
        }

        catalog
    }

    pub fn partition(&self, category: Category) -> &[Arc<PetDefinition>] {
        match category {
            Category::Normal => &self.normal,
            Category::Exotic => &self.exotic,
            Category::Rare => &self.rare,
            Category::RareExotic => &self.rare_exotic,
        }
    }

    pub fn get(&self, entry: u32) -> Option<&Arc<PetDefinition>> {
        self.by_entry.get(&entry)
    }

    pub fn len(&self) -> usize {
        self.by_entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entry.is_empty()
    }

    /// Definitions whose adopt code cannot be expressed on the wire.
    pub fn unreachable_entries(&self) -> Vec<u32> {
        let mut entries: Vec<u32> = self
            .by_entry
            .keys()
            .copied()
            .filter(|entry| Action::Adopt { entry: *entry }.encode().is_none())
            .collect();
        entries.sort_unstable();
        entries
    }
}

/// Shared, reloadable holder of the current [`Catalog`].
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        CatalogStore {
            current: RwLock::new(Arc::new(Catalog::default())),
        }
    }

    /// The catalog as of now. Holding the returned snapshot does not block
    /// reloads.
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Reloads the catalog from `source`.
    ///
    /// On failure the previous snapshot stays in place, which is the empty
    /// catalog before the first successful load.
    pub fn load(
        &self,
        source: &dyn TameSource,
        rare: &BTreeSet<u32>,
        rare_exotic: &BTreeSet<u32>,
    ) -> Result<Arc<Catalog>, LoadError> {
        let rows = match source.load_tames() {
            Ok(rows) => rows,
            Err(err) => {
                let err = LoadError::from(err);
                log::error!("Beastmaster: {err}");
                return Err(err);
            }
        };

        let catalog = Catalog::build(rows, rare, rare_exotic);
        log::info!(
            "Beastmaster: Loaded pets - total={}, normal={}, exotic={}, rare={}, rare_exotic={}",
            catalog.len(),
            catalog.normal.len(),
            catalog.exotic.len(),
            catalog.rare.len(),
            catalog.rare_exotic.len()
        );

        if catalog.is_empty() {
            log::error!("Beastmaster: {}", LoadError::Empty);
            return Err(LoadError::Empty);
        }

        let unreachable = catalog.unreachable_entries();
        if !unreachable.is_empty() {
            log::warn!(
                "Beastmaster: {} pet(s) cannot be adopted, their entries collide with tracked-pet action codes: {:?}",
                unreachable.len(),
                unreachable
            );
        }

        let catalog = Arc::new(catalog);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&catalog);
        Ok(catalog)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
