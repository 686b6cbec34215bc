//! Numeric constants shared by the beastmaster server and anything that
//! speaks its gossip protocol.

// ---------------------------------------------------------------------------
//  Classes
// ---------------------------------------------------------------------------

/// Class id of the primary pet-owning role.
pub const CLASS_HUNTER: u8 = 3;

// ---------------------------------------------------------------------------
//  Spells
// ---------------------------------------------------------------------------

pub const SPELL_CALL_PET: u32 = 883;
pub const SPELL_TAME_BEAST: u32 = 13481;
pub const SPELL_BEAST_MASTERY: u32 = 53270;

/// Abilities granted to non-hunters on their first adoption and removed by
/// the "Unlearn Hunter Abilities" option.
pub const HUNTER_SPELLS: [u32; 8] = [883, 982, 2641, 6991, 48990, 1002, 1462, 6197];

/// Happiness value a freshly adopted or summoned pet is set to.
pub const PET_MAX_HAPPINESS: u32 = 1_048_000;

/// Sound played when the root menu opens.
pub const SOUND_BEASTMASTER_HOWL: u32 = 9036;

// ---------------------------------------------------------------------------
//  Gossip
// ---------------------------------------------------------------------------

/// Default creature entry of the beastmaster NPC.
pub const DEFAULT_NPC_ENTRY: u32 = 601_026;

/// Text id shown above the root menu.
pub const GOSSIP_TEXT_HELLO: u32 = 601_026;
/// Text id shown above browse and tracked-pet pages.
pub const GOSSIP_TEXT_BROWSE: u32 = 601_027;

/// Pets per browse page.
pub const BROWSE_PAGE_SIZE: usize = 13;
/// Tracked pets per page of the "My Tamed Pets" menu.
pub const TRACKED_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
//  Action code bands
// ---------------------------------------------------------------------------

pub const ACTION_NONE: u32 = 0;
pub const ACTION_VENDOR: u32 = 3;
pub const ACTION_STABLE: u32 = 14;
pub const ACTION_MAIN_MENU: u32 = 50;
pub const ACTION_REMOVE_SKILLS: u32 = 80;

pub const BAND_NORMAL_START: u32 = 501;
pub const BAND_EXOTIC_START: u32 = 601;
pub const BAND_RARE_START: u32 = 701;
pub const BAND_RARE_EXOTIC_START: u32 = 801;

/// Codes at or above this value (outside the tracked bands) adopt the
/// definition `code - ADOPT_OFFSET`.
pub const ADOPT_OFFSET: u32 = 901;

pub const BAND_TRACKED_MENU_START: u32 = 1000;
pub const BAND_SUMMON_START: u32 = 2000;
pub const BAND_RENAME_START: u32 = 3000;
pub const BAND_DELETE_START: u32 = 4000;
/// First code past the delete band.
pub const BAND_TRACKED_END: u32 = 5000;

/// Width of each browse band.
pub const BROWSE_BAND_WIDTH: u32 = 100;
/// Width of each tracked band.
pub const TRACKED_BAND_WIDTH: u32 = 1000;

// ---------------------------------------------------------------------------
//  Pet names
// ---------------------------------------------------------------------------

pub const PET_NAME_MIN_LEN: usize = 2;
pub const PET_NAME_MAX_LEN: usize = 16;
