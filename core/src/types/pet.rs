use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::constants::{
    BAND_EXOTIC_START, BAND_NORMAL_START, BAND_RARE_EXOTIC_START, BAND_RARE_START,
};
use crate::types::GossipIcon;

/// Creature families whose pets are listed with the trainer icon.
const TRAINER_ICON_FAMILIES: [u32; 17] = [1, 2, 3, 4, 7, 8, 9, 10, 15, 20, 21, 24, 25, 27, 30, 31, 34];

/// One row of the `beastmaster_tames` table as it is stored in KeyDB and in
/// seed files.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct TameRow {
    pub entry: u32,
    pub name: String,
    pub family: u32,
    pub rarity: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Normal,
    Exotic,
    Rare,
    RareExotic,
}

impl Rarity {
    /// Parses the free-form rarity column. Anything unrecognised is normal.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "exotic" => Rarity::Exotic,
            "rare" => Rarity::Rare,
            "rare-exotic" | "rare_exotic" | "rareexotic" => Rarity::RareExotic,
            _ => Rarity::Normal,
        }
    }

    /// Whether adopting a pet of this rarity is subject to the exotic rules.
    pub fn is_exotic(self) -> bool {
        matches!(self, Rarity::Exotic | Rarity::RareExotic)
    }
}

/// The four browse categories of the catalog, each owning one action band.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Normal,
    Exotic,
    Rare,
    RareExotic,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Normal,
        Category::Exotic,
        Category::Rare,
        Category::RareExotic,
    ];

    /// First action code of the category's browse band; it denotes page 1.
    pub fn band_start(self) -> u32 {
        match self {
            Category::Normal => BAND_NORMAL_START,
            Category::Exotic => BAND_EXOTIC_START,
            Category::Rare => BAND_RARE_START,
            Category::RareExotic => BAND_RARE_EXOTIC_START,
        }
    }

    /// Exotic categories require beast mastery to browse.
    pub fn is_exotic(self) -> bool {
        matches!(self, Category::Exotic | Category::RareExotic)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Exotic => "exotic",
            Category::Rare => "rare",
            Category::RareExotic => "rare-exotic",
        }
    }
}

/// An adoptable pet, immutable once the catalog is built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PetDefinition {
    pub entry: u32,
    pub name: String,
    pub family: u32,
    pub rarity: Rarity,
    /// Rarity text as stored, shown in tracked-pet labels.
    pub rarity_label: String,
    pub icon: GossipIcon,
}

impl PetDefinition {
    pub fn from_row(row: TameRow) -> Self {
        let icon = if TRAINER_ICON_FAMILIES.contains(&row.family) {
            GossipIcon::Trainer
        } else {
            GossipIcon::Vendor
        };

        PetDefinition {
            entry: row.entry,
            rarity: Rarity::parse(&row.rarity),
            rarity_label: row.rarity,
            name: row.name,
            family: row.family,
            icon,
        }
    }
}
