use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A persisted record of a pet a player adopted while tracking was enabled.
///
/// Keyed by `(owner_id, entry)`. Only `name` ever changes after creation.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct TrackedPetRecord {
    pub owner_id: u64,
    pub entry: u32,
    pub name: String,
    /// Adoption time in milliseconds since the Unix epoch.
    pub tamed_at: i64,
}

impl TrackedPetRecord {
    pub fn new(owner_id: u64, entry: u32, name: &str, tamed_at: i64) -> Self {
        TrackedPetRecord {
            owner_id,
            entry,
            name: name.to_string(),
            tamed_at,
        }
    }
}

/// Sorts records most recently tamed first. Ties fall back to the entry so
/// the order is stable across backends.
pub fn sort_newest_first(records: &mut [TrackedPetRecord]) {
    records.sort_by(|a, b| b.tamed_at.cmp(&a.tamed_at).then(a.entry.cmp(&b.entry)));
}
