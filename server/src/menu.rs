//! Gossip menu rendering.
//!
//! Renderers are pure: they turn catalog and player data into a
//! [`GossipMenu`] and never touch storage.

use std::collections::HashSet;
use std::sync::Arc;

use bm_core::action::{max_page, on_page, Action};
use bm_core::constants::{
    ACTION_MAIN_MENU, ACTION_REMOVE_SKILLS, ACTION_STABLE, ACTION_VENDOR, BAND_TRACKED_MENU_START,
    BROWSE_PAGE_SIZE, GOSSIP_TEXT_BROWSE, GOSSIP_TEXT_HELLO, TRACKED_PAGE_SIZE,
};
use bm_core::types::{Category, GossipIcon, GossipMenu, PetDefinition, TrackedPetRecord};

use crate::catalog::Catalog;
use crate::session::MenuIndexMap;

/// Which optional lines the root menu carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootOptions {
    pub show_exotic: bool,
    pub show_unlearn: bool,
    pub show_tracked: bool,
    pub show_stable: bool,
}

pub fn root_menu(options: RootOptions) -> GossipMenu {
    let mut menu = GossipMenu::new(GOSSIP_TEXT_HELLO);
    menu.push(GossipIcon::Battle, "Browse Pets", Category::Normal.band_start());
    menu.push(GossipIcon::Battle, "Browse Rare Pets", Category::Rare.band_start());

    if options.show_exotic {
        menu.push(GossipIcon::Battle, "Browse Exotic Pets", Category::Exotic.band_start());
        menu.push(
            GossipIcon::Battle,
            "Browse Rare Exotic Pets",
            Category::RareExotic.band_start(),
        );
    }
    if options.show_unlearn {
        menu.push(GossipIcon::Battle, "Unlearn Hunter Abilities", ACTION_REMOVE_SKILLS);
    }
    if options.show_tracked {
        menu.push(GossipIcon::Chat, "My Tamed Pets", BAND_TRACKED_MENU_START);
    }
    if options.show_stable {
        menu.push(GossipIcon::Taxi, "Visit Stable", ACTION_STABLE);
    }
    menu.push(GossipIcon::MoneyBag, "Buy Pet Food", ACTION_VENDOR);
    menu
}

/// One page of a catalog partition.
///
/// Entries in `owned` are shown as inert "(Already Tamed)" lines.
pub fn browse_page(
    category: Category,
    page: u32,
    pets: &[Arc<PetDefinition>],
    owned: &HashSet<u32>,
) -> GossipMenu {
    let mut menu = GossipMenu::new(GOSSIP_TEXT_BROWSE);
    menu.push(GossipIcon::Talk, "Back..", ACTION_MAIN_MENU);
    push_navigation(
        &mut menu,
        page,
        max_page(pets.len(), BROWSE_PAGE_SIZE),
        |page| Action::Browse { category, page },
    );

    for (position, pet) in pets.iter().enumerate() {
        if !on_page(position + 1, page, BROWSE_PAGE_SIZE) {
            continue;
        }
        if owned.contains(&pet.entry) {
            menu.push_inert(format!("{} (Already Tamed)", pet.name));
            continue;
        }
        match (Action::Adopt { entry: pet.entry }).encode() {
            Some(code) => menu.push(pet.icon, pet.name.clone(), code),
            None => menu.push_inert(format!("{} (unavailable)", pet.name)),
        }
    }

    menu
}

/// One page of a player's tracked pets, plus the index map that resolves the
/// summon, rename and delete lines it contains.
pub fn tracked_page(
    page: u32,
    records: &[TrackedPetRecord],
    catalog: &Catalog,
) -> (GossipMenu, MenuIndexMap) {
    let mut menu = GossipMenu::new(GOSSIP_TEXT_BROWSE);
    menu.push(GossipIcon::Talk, "Back..", ACTION_MAIN_MENU);
    push_navigation(
        &mut menu,
        page,
        max_page(records.len(), TRACKED_PAGE_SIZE),
        |page| Action::TrackedMenu { page },
    );

    if records.is_empty() {
        menu.push_inert("You have no tracked pets.");
    }

    let mut shown = Vec::new();
    let rows = records
        .iter()
        .enumerate()
        .filter(|(position, _)| on_page(position + 1, page, TRACKED_PAGE_SIZE));
    for (index, (_, record)) in rows.enumerate() {
        let index = index as u32;
        let label = match catalog.get(record.entry) {
            Some(def) => format!("{} [{}, {}]", record.name, def.name, def.rarity_label),
            None => record.name.clone(),
        };

        let lines = [
            (GossipIcon::Taxi, "Summon", Action::Summon { index }),
            (GossipIcon::Trainer, "Rename", Action::Rename { index }),
            (GossipIcon::Battle, "Delete", Action::Delete { index }),
        ];
        for (icon, verb, action) in lines {
            if let Some(code) = action.encode() {
                menu.push(icon, format!("{verb}: {label}"), code);
            }
        }
        shown.push(record.entry);
    }

    (menu, MenuIndexMap::new(page, shown))
}

fn push_navigation(menu: &mut GossipMenu, page: u32, max_page: u32, to_page: impl Fn(u32) -> Action) {
    if page > 1 {
        if let Some(code) = to_page(page - 1).encode() {
            menu.push(GossipIcon::Interact1, "Previous..", code);
        }
    }
    if page < max_page {
        if let Some(code) = to_page(page + 1).encode() {
            menu.push(GossipIcon::Interact1, "Next..", code);
        }
    }
}
