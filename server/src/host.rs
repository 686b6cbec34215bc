//! The boundary to the game server hosting the beastmaster.
//!
//! The host owns players, pets and the gossip window. It hands each
//! interaction to [`crate::Beastmaster`] as a [`PlayerHandle`] and applies
//! the returned [`Reply`].

use std::time::Duration;

use bm_core::constants::SPELL_BEAST_MASTERY;
use bm_core::types::{GossipMenu, PlayerId};

use crate::eligibility::PlayerProfile;

/// Everything the beastmaster needs to read from or do to a player.
pub trait PlayerHandle {
    fn id(&self) -> PlayerId;
    fn name(&self) -> &str;
    fn class_id(&self) -> u8;
    fn race_id(&self) -> u8;
    fn level(&self) -> u32;
    fn is_game_master(&self) -> bool;

    fn has_spell(&self, spell: u32) -> bool;
    /// Whether `spell` is a talent of the active talent tree.
    fn has_talent(&self, spell: u32) -> bool;
    fn learn_spell(&mut self, spell: u32);
    fn remove_spell(&mut self, spell: u32);

    /// Whether the player has a companion out or pending.
    fn has_pet(&self) -> bool;
    /// Whether the current companion is a hunter pet.
    fn has_hunter_pet(&self) -> bool;
    /// Creates a companion from creature `entry` through `spell`.
    ///
    /// # Returns
    ///
    /// The companion's name, or `None` if the host refused.
    fn create_pet(&mut self, entry: u32, spell: u32) -> Option<String>;
    fn set_pet_name(&mut self, name: &str);
    fn set_pet_happiness(&mut self, happiness: u32);

    /// Spawns the beastmaster NPC next to the player for `duration`.
    fn summon_npc(&mut self, npc_entry: u32, duration: Duration) -> bool;

    fn profile(&self) -> PlayerProfile {
        PlayerProfile {
            name: self.name().to_string(),
            class_id: self.class_id(),
            race_id: self.race_id(),
            level: self.level(),
            knows_beast_mastery: self.has_spell(SPELL_BEAST_MASTERY),
            has_beast_mastery_talent: self.has_talent(SPELL_BEAST_MASTERY),
        }
    }
}

/// Windows the host opens on the beastmaster's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    OpenStable,
    OpenVendor,
}

/// What the host should show after an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Gossip window to (re)open.
    pub menu: Option<GossipMenu>,
    /// Lines the NPC whispers to the player.
    pub whispers: Vec<String>,
    /// System chat lines.
    pub messages: Vec<String>,
    /// Close the gossip window.
    pub close: bool,
    pub sound: Option<u32>,
    pub host_action: Option<HostAction>,
}

impl Reply {
    pub fn none() -> Self {
        Reply::default()
    }

    pub fn menu(menu: GossipMenu) -> Self {
        Reply {
            menu: Some(menu),
            ..Reply::default()
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Reply::default().with_message(text)
    }

    /// A whisper that also closes the window.
    pub fn whisper(text: impl Into<String>) -> Self {
        Reply::default().with_whisper(text).closed()
    }

    pub fn host(action: HostAction) -> Self {
        Reply {
            host_action: Some(action),
            ..Reply::default()
        }
    }

    pub fn with_whisper(mut self, text: impl Into<String>) -> Self {
        self.whispers.push(text.into());
        self
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        self.messages.push(text.into());
        self
    }

    pub fn with_sound(mut self, sound: u32) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn closed(mut self) -> Self {
        self.close = true;
        self
    }

    /// Whether the host has nothing to do.
    pub fn is_empty(&self) -> bool {
        *self == Reply::default()
    }
}
