//! Data types shared between the beastmaster server and its gossip transport.

mod gossip;
mod pet;
mod tracked;

// Re-export all types
pub use gossip::{GossipIcon, GossipItem, GossipMenu};
pub use pet::{Category, PetDefinition, Rarity, TameRow};
pub use tracked::{sort_newest_first, TrackedPetRecord};

/// Persistent player identity (the low counter of the player's guid).
pub type PlayerId = u64;

