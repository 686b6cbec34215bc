//! Beastmaster NPC: pet adoption, tracking and management for a game server.
//!
//! The host game server drives everything through [`Beastmaster`], handing
//! in a [`host::PlayerHandle`] and a [`session::Session`] per interaction
//! and applying the returned [`host::Reply`].

/// The shared context and its gossip, command and player hooks.
pub mod beastmaster;

/// Per-player cache of tracked pets.
pub mod cache;

/// The adoptable-pet catalog and its reloadable holder.
pub mod catalog;

/// Chat command parsing and NPC summon cooldowns.
pub mod commands;

/// Settings read from the environment, with defaults and normalization.
pub mod config;

/// Pet name denylist backed by a text file.
pub mod denylist;

/// Who may adopt, and which pets.
pub mod eligibility;

/// The host boundary: player access and replies.
pub mod host;

/// Idle emote timer of a spawned NPC.
pub mod idle;

/// KeyDB/Redis connection helpers.
pub mod keydb;

/// KeyDB-backed implementations of the storage traits.
pub mod keydb_store;

/// Tracked-pet creation, renaming and deletion.
pub mod lifecycle;

/// Gossip menu rendering.
pub mod menu;

/// Storage traits and the in-memory backend.
pub mod repository;

/// Per-player interaction state.
pub mod session;

pub use beastmaster::Beastmaster;
