//! Who may adopt which pets.
//!
//! Everything here is a pure function of a [`PlayerProfile`] and the config.

use bm_core::constants::CLASS_HUNTER;
use bm_core::types::Rarity;

use crate::catalog::Catalog;
use crate::config::BeastmasterConfig;

/// The parts of a player the eligibility rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub name: String,
    pub class_id: u8,
    pub race_id: u8,
    pub level: u32,
    /// Beast Mastery known as a spell.
    pub knows_beast_mastery: bool,
    /// Beast Mastery taken as a talent in the active talent tree.
    pub has_beast_mastery_talent: bool,
}

impl PlayerProfile {
    pub fn is_hunter(&self) -> bool {
        self.class_id == CLASS_HUNTER
    }

    pub fn has_beast_mastery(&self) -> bool {
        self.knows_beast_mastery || self.has_beast_mastery_talent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    CatalogUnavailable,
    /// `hunter_only` tells the hunter-only rule apart from the class allowlist.
    DeniedClass { hunter_only: bool },
    DeniedRace,
    DeniedLevelLow { min: u32 },
    DeniedLevelHigh { max: u32 },
    /// Exotic pet, non-hunter, exotic pets not opened to other classes.
    DeniedExoticClass,
    DeniedNoBeastMastery,
}

impl Eligibility {
    pub fn is_allowed(self) -> bool {
        self == Eligibility::Allowed
    }

    /// Text shown to the player, `None` when allowed.
    pub fn message(self, player_name: &str) -> Option<String> {
        let text = match self {
            Eligibility::Allowed => return None,
            Eligibility::CatalogUnavailable => {
                "No pets available (beastmaster_tames table empty?). Contact an administrator."
                    .to_string()
            }
            Eligibility::DeniedClass { hunter_only: true } => {
                "I am sorry, but pets are for hunters only.".to_string()
            }
            Eligibility::DeniedClass { hunter_only: false } => {
                "Your class is not allowed to adopt pets.".to_string()
            }
            Eligibility::DeniedRace => "Your race is not allowed to adopt pets.".to_string(),
            Eligibility::DeniedLevelLow { min } => format!(
                "Sorry {player_name}, but you must reach level {min} before adopting a pet."
            ),
            Eligibility::DeniedLevelHigh { max } => format!(
                "Sorry {player_name}, but you must be level {max} or lower to adopt a pet."
            ),
            Eligibility::DeniedExoticClass => "Only hunters can adopt exotic pets.".to_string(),
            Eligibility::DeniedNoBeastMastery => {
                "You need the Beast Mastery talent to adopt exotic pets.".to_string()
            }
        };
        Some(text)
    }
}

/// Whether `player` may use the beastmaster at all.
///
/// Checks run in a fixed order: catalog, hunter-only rule, class allowlist,
/// race allowlist, minimum level, maximum level. The first failure wins.
pub fn evaluate(player: &PlayerProfile, config: &BeastmasterConfig, catalog: &Catalog) -> Eligibility {
    if catalog.is_empty() {
        return Eligibility::CatalogUnavailable;
    }
    if config.hunter_only && !player.is_hunter() {
        return Eligibility::DeniedClass { hunter_only: true };
    }
    if !config.allowed_classes.is_empty() && !config.allowed_classes.contains(&player.class_id) {
        return Eligibility::DeniedClass { hunter_only: false };
    }
    if !config.allowed_races.is_empty() && !config.allowed_races.contains(&player.race_id) {
        return Eligibility::DeniedRace;
    }
    if config.min_level != 0 && player.level < config.min_level {
        return Eligibility::DeniedLevelLow {
            min: config.min_level,
        };
    }
    if config.max_level != 0 && player.level > config.max_level {
        return Eligibility::DeniedLevelHigh {
            max: config.max_level,
        };
    }
    Eligibility::Allowed
}

/// Whether the exotic browse entries are offered to `player`.
///
/// Open when exotic pets are globally allowed or the player knows Beast
/// Mastery. Hunters additionally need the talent while
/// `hunter_beast_mastery_required` is set.
pub fn can_browse_exotic(player: &PlayerProfile, config: &BeastmasterConfig) -> bool {
    if !(config.allow_exotic || player.has_beast_mastery()) {
        return false;
    }
    if !player.is_hunter() {
        return true;
    }
    !config.hunter_beast_mastery_required || player.has_beast_mastery_talent
}

/// Rarity-specific adoption rules, checked after [`evaluate`].
pub fn check_adoption(player: &PlayerProfile, config: &BeastmasterConfig, rarity: Rarity) -> Eligibility {
    if !rarity.is_exotic() {
        return Eligibility::Allowed;
    }
    if !player.is_hunter() {
        if config.allow_exotic {
            return Eligibility::Allowed;
        }
        return Eligibility::DeniedExoticClass;
    }
    if config.hunter_beast_mastery_required && !player.has_beast_mastery_talent {
        return Eligibility::DeniedNoBeastMastery;
    }
    Eligibility::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_core::types::TameRow;
    use std::collections::BTreeSet;

    const WARRIOR: u8 = 1;
    const HUMAN: u8 = 1;
    const ORC: u8 = 2;

    fn hunter(level: u32) -> PlayerProfile {
        PlayerProfile {
            name: "Rexxar".to_string(),
            class_id: CLASS_HUNTER,
            race_id: ORC,
            level,
            knows_beast_mastery: false,
            has_beast_mastery_talent: false,
        }
    }

    fn catalog() -> Catalog {
        let row = TameRow {
            entry: 1,
            name: "Wolf".to_string(),
            family: 1,
            rarity: String::new(),
        };
        Catalog::build(vec![row], &BTreeSet::new(), &BTreeSet::new())
    }

    #[test]
    fn empty_catalog_short_circuits() {
        let config = BeastmasterConfig::default();
        assert_eq!(
            evaluate(&hunter(80), &config, &Catalog::default()),
            Eligibility::CatalogUnavailable
        );
    }

    #[test]
    fn checks_run_in_order() {
        let mut config = BeastmasterConfig {
            allowed_classes: BTreeSet::from([CLASS_HUNTER]),
            allowed_races: BTreeSet::from([HUMAN]),
            min_level: 10,
            max_level: 60,
            ..BeastmasterConfig::default()
        };
        let mut player = hunter(5);
        player.class_id = WARRIOR;
        let catalog = catalog();

        assert_eq!(
            evaluate(&player, &config, &catalog),
            Eligibility::DeniedClass { hunter_only: true }
        );
        config.hunter_only = false;
        assert_eq!(
            evaluate(&player, &config, &catalog),
            Eligibility::DeniedClass { hunter_only: false }
        );
        player.class_id = CLASS_HUNTER;
        assert_eq!(evaluate(&player, &config, &catalog), Eligibility::DeniedRace);
        player.race_id = HUMAN;
        assert_eq!(
            evaluate(&player, &config, &catalog),
            Eligibility::DeniedLevelLow { min: 10 }
        );
        player.level = 70;
        assert_eq!(
            evaluate(&player, &config, &catalog),
            Eligibility::DeniedLevelHigh { max: 60 }
        );
        player.level = 60;
        assert_eq!(evaluate(&player, &config, &catalog), Eligibility::Allowed);
    }

    #[test]
    fn zero_level_bounds_are_disabled() {
        let config = BeastmasterConfig {
            min_level: 0,
            max_level: 0,
            ..BeastmasterConfig::default()
        };
        assert!(evaluate(&hunter(1), &config, &catalog()).is_allowed());
        assert!(evaluate(&hunter(255), &config, &catalog()).is_allowed());
    }

    #[test]
    fn denial_texts_name_the_player() {
        assert_eq!(
            Eligibility::DeniedLevelLow { min: 10 }.message("Rexxar").as_deref(),
            Some("Sorry Rexxar, but you must reach level 10 before adopting a pet.")
        );
        assert_eq!(Eligibility::Allowed.message("Rexxar"), None);
    }

    #[test]
    fn exotic_visibility() {
        let mut config = BeastmasterConfig::default();
        let mut player = hunter(80);
        assert!(!can_browse_exotic(&player, &config));

        player.knows_beast_mastery = true;
        assert!(!can_browse_exotic(&player, &config));
        player.has_beast_mastery_talent = true;
        assert!(can_browse_exotic(&player, &config));

        let mut mage = hunter(80);
        mage.class_id = 8;
        assert!(!can_browse_exotic(&mage, &config));
        config.allow_exotic = true;
        assert!(can_browse_exotic(&mage, &config));

        config.hunter_beast_mastery_required = false;
        assert!(can_browse_exotic(&hunter(80), &config));
    }

    #[test]
    fn exotic_adoption_rules() {
        let mut config = BeastmasterConfig::default();
        let mut mage = hunter(80);
        mage.class_id = 8;

        assert!(check_adoption(&mage, &config, Rarity::Normal).is_allowed());
        assert!(check_adoption(&mage, &config, Rarity::Rare).is_allowed());
        assert_eq!(
            check_adoption(&mage, &config, Rarity::Exotic),
            Eligibility::DeniedExoticClass
        );
        assert_eq!(
            check_adoption(&mage, &config, Rarity::RareExotic),
            Eligibility::DeniedExoticClass
        );
        config.allow_exotic = true;
        assert!(check_adoption(&mage, &config, Rarity::Exotic).is_allowed());

        let mut player = hunter(80);
        assert_eq!(
            check_adoption(&player, &config, Rarity::Exotic),
            Eligibility::DeniedNoBeastMastery
        );
        player.has_beast_mastery_talent = true;
        assert!(check_adoption(&player, &config, Rarity::Exotic).is_allowed());
    }
}
