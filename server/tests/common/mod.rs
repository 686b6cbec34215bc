//! Shared fixtures: a scripted player and a context over in-memory storage.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use beastmaster::config::BeastmasterConfig;
use beastmaster::host::{PlayerHandle, Reply};
use beastmaster::repository::InMemoryRepository;
use beastmaster::Beastmaster;
use bm_core::constants::CLASS_HUNTER;
use bm_core::types::{PlayerId, TameRow};

pub const CLASS_MAGE: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakePet {
    pub entry: u32,
    pub spell: u32,
    pub name: String,
    pub happiness: u32,
}

/// A player whose every effect is recorded for inspection.
#[derive(Debug, Clone)]
pub struct FakePlayer {
    pub id: PlayerId,
    pub name: String,
    pub class_id: u8,
    pub race_id: u8,
    pub level: u32,
    pub game_master: bool,
    pub spells: BTreeSet<u32>,
    pub talents: BTreeSet<u32>,
    pub pet: Option<FakePet>,
    pub refuse_pets: bool,
    pub summons: Vec<(u32, Duration)>,
}

impl FakePlayer {
    pub fn hunter(id: PlayerId) -> Self {
        FakePlayer {
            id,
            name: "Rexxar".to_string(),
            class_id: CLASS_HUNTER,
            race_id: 1,
            level: 80,
            game_master: false,
            spells: BTreeSet::new(),
            talents: BTreeSet::new(),
            pet: None,
            refuse_pets: false,
            summons: Vec::new(),
        }
    }

    pub fn mage(id: PlayerId) -> Self {
        FakePlayer {
            name: "Jaina".to_string(),
            class_id: CLASS_MAGE,
            ..FakePlayer::hunter(id)
        }
    }

    /// Sends the current companion away, as stabling or abandoning would.
    pub fn dismiss_pet(&mut self) {
        self.pet = None;
    }
}

impl PlayerHandle for FakePlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn class_id(&self) -> u8 {
        self.class_id
    }

    fn race_id(&self) -> u8 {
        self.race_id
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn is_game_master(&self) -> bool {
        self.game_master
    }

    fn has_spell(&self, spell: u32) -> bool {
        self.spells.contains(&spell)
    }

    fn has_talent(&self, spell: u32) -> bool {
        self.talents.contains(&spell)
    }

    fn learn_spell(&mut self, spell: u32) {
        self.spells.insert(spell);
    }

    fn remove_spell(&mut self, spell: u32) {
        self.spells.remove(&spell);
    }

    fn has_pet(&self) -> bool {
        self.pet.is_some()
    }

    fn has_hunter_pet(&self) -> bool {
        self.pet.is_some()
    }

    fn create_pet(&mut self, entry: u32, spell: u32) -> Option<String> {
        if self.refuse_pets || self.pet.is_some() {
            return None;
        }
        let name = format!("Beast{entry}");
        self.pet = Some(FakePet {
            entry,
            spell,
            name: name.clone(),
            happiness: 0,
        });
        Some(name)
    }

    fn set_pet_name(&mut self, name: &str) {
        if let Some(pet) = self.pet.as_mut() {
            pet.name = name.to_string();
        }
    }

    fn set_pet_happiness(&mut self, happiness: u32) {
        if let Some(pet) = self.pet.as_mut() {
            pet.happiness = happiness;
        }
    }

    fn summon_npc(&mut self, npc_entry: u32, duration: Duration) -> bool {
        self.summons.push((npc_entry, duration));
        true
    }
}

/// `count` pets with consecutive entries from `first`.
pub fn rows(first: u32, count: u32, rarity: &str) -> Vec<TameRow> {
    (first..first + count)
        .map(|entry| TameRow {
            entry,
            name: format!("Creature {entry}"),
            family: 1,
            rarity: rarity.to_string(),
        })
        .collect()
}

pub fn tracking_config() -> BeastmasterConfig {
    BeastmasterConfig {
        track_tamed_pets: true,
        profanity_filter: false,
        ..BeastmasterConfig::default()
    }
}

/// A context over an in-memory store seeded with `tames`. Reloads see an
/// empty environment.
pub fn context(tames: Vec<TameRow>, config: BeastmasterConfig) -> (Arc<InMemoryRepository>, Beastmaster) {
    let repo = Arc::new(InMemoryRepository::with_tames(tames));
    let beastmaster = Beastmaster::new(config, repo.clone(), repo.clone()).with_config_source(|_| None);
    (repo, beastmaster)
}

pub fn labels(reply: &Reply) -> Vec<String> {
    reply
        .menu
        .as_ref()
        .map(|menu| menu.items.iter().map(|item| item.label.clone()).collect())
        .unwrap_or_default()
}

pub fn action_of(reply: &Reply, label: &str) -> Option<u32> {
    reply.menu.as_ref()?.find(label).map(|item| item.action)
}
