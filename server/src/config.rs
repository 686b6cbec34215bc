//! Runtime configuration, read from the process environment.
//!
//! `main` calls `dotenvy::dotenv()` first so a `.env` file next to the
//! binary can provide any of the keys below.

use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

use bm_core::constants::{CLASS_HUNTER, DEFAULT_NPC_ENTRY};
use thiserror::Error;

use crate::keydb::DEFAULT_KEYDB_URL;

/// Tracked-pet quota above which lookups are expected to get slow.
const MAX_TRACKED_PETS_SANE: u32 = 1000;

/// Non-fatal findings produced while reading or normalising the config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("{key}={value:?} is not valid, using the default")]
    Malformed { key: &'static str, value: String },
    #[error("HunterOnly=1 but AllowedClasses contains non-hunter classes. HunterOnly takes precedence.")]
    HunterOnlyWithOtherClasses,
    #[error("MaxLevel ({max}) is lower than MinLevel ({min}). Swapping values.")]
    LevelBoundsSwapped { min: u32, max: u32 },
    #[error("Tracking disabled; MaxTrackedPets ignored (set to {0}).")]
    QuotaIgnored(u32),
    #[error("MaxTrackedPets={0} is very high and may impact performance.")]
    QuotaVeryHigh(u32),
    #[error("AllowExotic=1 allows non-hunters exotic pets regardless of HunterBeastMasteryRequired.")]
    ExoticIgnoresMastery,
}

impl ConfigWarning {
    /// Informational findings are logged at info, the rest at warn.
    pub fn log(&self) {
        match self {
            ConfigWarning::QuotaIgnored(_) | ConfigWarning::ExoticIgnoresMastery => {
                log::info!("Beastmaster: {self}")
            }
            _ => log::warn!("Beastmaster: {self}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeastmasterConfig {
    pub enabled: bool,
    pub hunter_only: bool,
    pub allow_exotic: bool,
    pub keep_pet_happy: bool,
    /// 0 disables the lower bound.
    pub min_level: u32,
    /// 0 disables the upper bound.
    pub max_level: u32,
    pub hunter_beast_mastery_required: bool,
    pub track_tamed_pets: bool,
    /// 0 means unlimited.
    pub max_tracked_pets: u32,
    /// Empty means every race is allowed.
    pub allowed_races: BTreeSet<u8>,
    /// Empty means every class is allowed.
    pub allowed_classes: BTreeSet<u8>,
    pub rare_pets: BTreeSet<u32>,
    pub rare_exotic_pets: BTreeSet<u32>,
    pub profanity_filter: bool,
    pub profanity_file: PathBuf,
    pub summon_cooldown_secs: u64,
    pub npc_entry: u32,
    pub show_login_notice: bool,
    /// Empty means the built-in notice.
    pub login_message: String,
    pub keydb_url: String,
}

impl Default for BeastmasterConfig {
    fn default() -> Self {
        BeastmasterConfig {
            enabled: true,
            hunter_only: true,
            allow_exotic: false,
            keep_pet_happy: false,
            min_level: 10,
            max_level: 0,
            hunter_beast_mastery_required: true,
            track_tamed_pets: false,
            max_tracked_pets: 20,
            allowed_races: BTreeSet::new(),
            allowed_classes: BTreeSet::new(),
            rare_pets: BTreeSet::new(),
            rare_exotic_pets: BTreeSet::new(),
            profanity_filter: true,
            profanity_file: PathBuf::from("conf/profanity.txt"),
            summon_cooldown_secs: 120,
            npc_entry: DEFAULT_NPC_ENTRY,
            show_login_notice: true,
            login_message: String::new(),
            keydb_url: DEFAULT_KEYDB_URL.to_string(),
        }
    }
}

impl BeastmasterConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> (Self, Vec<ConfigWarning>) {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, then normalises it.
    ///
    /// # Returns
    ///
    /// The config plus every warning found. Warnings are not logged here.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigWarning>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut reader = Reader {
            lookup: &lookup,
            warnings: Vec::new(),
        };
        let defaults = BeastmasterConfig::default();

        let mut config = BeastmasterConfig {
            enabled: reader.flag("BEASTMASTER_ENABLE", defaults.enabled),
            hunter_only: reader.flag("BEASTMASTER_HUNTER_ONLY", defaults.hunter_only),
            allow_exotic: reader.flag("BEASTMASTER_ALLOW_EXOTIC", defaults.allow_exotic),
            keep_pet_happy: reader.flag("BEASTMASTER_KEEP_PET_HAPPY", defaults.keep_pet_happy),
            min_level: reader.number("BEASTMASTER_MIN_LEVEL", defaults.min_level),
            max_level: reader.number("BEASTMASTER_MAX_LEVEL", defaults.max_level),
            hunter_beast_mastery_required: reader.flag(
                "BEASTMASTER_HUNTER_BEAST_MASTERY_REQUIRED",
                defaults.hunter_beast_mastery_required,
            ),
            track_tamed_pets: reader.flag(
                "BEASTMASTER_TRACK_TAMED_PETS",
                defaults.track_tamed_pets,
            ),
            max_tracked_pets: reader.number(
                "BEASTMASTER_MAX_TRACKED_PETS",
                defaults.max_tracked_pets,
            ),
            allowed_races: parse_id_list(&reader.text("BEASTMASTER_ALLOWED_RACES", "0")),
            allowed_classes: parse_id_list(&reader.text("BEASTMASTER_ALLOWED_CLASSES", "0")),
            rare_pets: parse_entry_list(&reader.text("BEASTMASTER_RARE_PETS", "")),
            rare_exotic_pets: parse_entry_list(&reader.text("BEASTMASTER_RARE_EXOTIC_PETS", "")),
            profanity_filter: reader.flag(
                "BEASTMASTER_PROFANITY_FILTER",
                defaults.profanity_filter,
            ),
            profanity_file: reader
                .optional("BEASTMASTER_PROFANITY_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.profanity_file),
            summon_cooldown_secs: reader.number(
                "BEASTMASTER_SUMMON_COOLDOWN",
                defaults.summon_cooldown_secs,
            ),
            npc_entry: reader.number("BEASTMASTER_NPC_ENTRY", defaults.npc_entry),
            show_login_notice: reader.flag(
                "BEASTMASTER_SHOW_LOGIN_NOTICE",
                defaults.show_login_notice,
            ),
            login_message: reader.text("BEASTMASTER_LOGIN_MESSAGE", ""),
            keydb_url: reader
                .optional("BEASTMASTER_KEYDB_URL")
                .unwrap_or(defaults.keydb_url),
        };

        let mut warnings = reader.warnings;
        warnings.extend(config.normalize());
        (config, warnings)
    }

    /// Sanity-checks related settings. Misordered level bounds are swapped.
    pub fn normalize(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.hunter_only
            && !self.allowed_classes.is_empty()
            && (self.allowed_classes.len() != 1 || !self.allowed_classes.contains(&CLASS_HUNTER))
        {
            warnings.push(ConfigWarning::HunterOnlyWithOtherClasses);
        }

        if self.max_level != 0 && self.min_level != 0 && self.max_level < self.min_level {
            warnings.push(ConfigWarning::LevelBoundsSwapped {
                min: self.min_level,
                max: self.max_level,
            });
            std::mem::swap(&mut self.min_level, &mut self.max_level);
        }

        if !self.track_tamed_pets && self.max_tracked_pets == 0 {
            warnings.push(ConfigWarning::QuotaIgnored(self.max_tracked_pets));
        }

        if self.track_tamed_pets && self.max_tracked_pets > MAX_TRACKED_PETS_SANE {
            warnings.push(ConfigWarning::QuotaVeryHigh(self.max_tracked_pets));
        }

        if self.allow_exotic && self.hunter_beast_mastery_required {
            warnings.push(ConfigWarning::ExoticIgnoresMastery);
        }

        warnings
    }
}

struct Reader<'a, F> {
    lookup: &'a F,
    warnings: Vec<ConfigWarning>,
}

impl<F> Reader<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn text(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&mut self, key: &'static str, default: bool) -> bool {
        let Some(value) = self.optional(key) else {
            return default;
        };
        match parse_flag(&value) {
            Some(flag) => flag,
            None => {
                self.warnings.push(ConfigWarning::Malformed { key, value });
                default
            }
        }
    }

    fn number<T: std::str::FromStr>(&mut self, key: &'static str, default: T) -> T {
        let Some(value) = self.optional(key) else {
            return default;
        };
        match value.parse::<T>() {
            Ok(number) => number,
            Err(_) => {
                self.warnings.push(ConfigWarning::Malformed { key, value });
                default
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Comma separated race or class ids. Zero and non-numeric items are skipped.
fn parse_id_list(csv: &str) -> BTreeSet<u8> {
    csv.split(',')
        .filter_map(|item| item.trim().parse::<u8>().ok())
        .filter(|id| *id > 0)
        .collect()
}

/// Comma separated creature entries. Non-numeric items are skipped.
fn parse_entry_list(csv: &str) -> BTreeSet<u32> {
    csv.split(',')
        .filter_map(|item| item.trim().parse::<u32>().ok())
        .collect()
}
