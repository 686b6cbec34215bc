//! Gossip action codes.
//!
//! The client sends a single `u32` back for every menu line it is offered.
//! The value space is carved into fixed bands, checked in this order:
//!
//! | Code            | Meaning                                   |
//! |-----------------|-------------------------------------------|
//! | 0               | inert line                                |
//! | 3 / 14          | open vendor / stable window               |
//! | 50              | back to the root menu                     |
//! | 80              | unlearn hunter abilities                  |
//! | 501..=600       | browse normal pets, page `code - 500`     |
//! | 601..=700       | browse exotic pets                        |
//! | 701..=800       | browse rare pets                          |
//! | 801..=900       | browse rare exotic pets                   |
//! | 901..=999       | adopt entry `code - 901`                  |
//! | 1000..=1999     | tracked pets, page `code - 999`           |
//! | 2000..=2999     | summon tracked pet at menu index          |
//! | 3000..=3999     | rename tracked pet at menu index          |
//! | 4000..=4999     | delete tracked pet at menu index          |
//! | 5000..          | adopt entry `code - 901`                  |
//!
//! Inside the server every code is handled as an [`Action`]; the integer
//! form only exists at the transport boundary.

use crate::constants::*;
use crate::types::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Code 0 or any code outside every band.
    None,
    MainMenu,
    Vendor,
    Stable,
    RemoveSkills,
    Browse { category: Category, page: u32 },
    Adopt { entry: u32 },
    TrackedMenu { page: u32 },
    Summon { index: u32 },
    Rename { index: u32 },
    Delete { index: u32 },
}

impl Action {
    pub fn decode(code: u32) -> Action {
        match code {
            ACTION_MAIN_MENU => Action::MainMenu,
            ACTION_REMOVE_SKILLS => Action::RemoveSkills,
            ACTION_VENDOR => Action::Vendor,
            ACTION_STABLE => Action::Stable,
            c if (BAND_NORMAL_START..BAND_EXOTIC_START).contains(&c) => {
                browse(Category::Normal, c)
            }
            c if (BAND_EXOTIC_START..BAND_RARE_START).contains(&c) => browse(Category::Exotic, c),
            c if (BAND_RARE_START..BAND_RARE_EXOTIC_START).contains(&c) => {
                browse(Category::Rare, c)
            }
            c if (BAND_RARE_EXOTIC_START..ADOPT_OFFSET).contains(&c) => {
                browse(Category::RareExotic, c)
            }
            c if (ADOPT_OFFSET..BAND_TRACKED_MENU_START).contains(&c) => Action::Adopt {
                entry: c - ADOPT_OFFSET,
            },
            c if (BAND_TRACKED_MENU_START..BAND_SUMMON_START).contains(&c) => {
                Action::TrackedMenu {
                    page: c - BAND_TRACKED_MENU_START + 1,
                }
            }
            c if (BAND_SUMMON_START..BAND_RENAME_START).contains(&c) => Action::Summon {
                index: c - BAND_SUMMON_START,
            },
            c if (BAND_RENAME_START..BAND_DELETE_START).contains(&c) => Action::Rename {
                index: c - BAND_RENAME_START,
            },
            c if (BAND_DELETE_START..BAND_TRACKED_END).contains(&c) => Action::Delete {
                index: c - BAND_DELETE_START,
            },
            c if c >= BAND_TRACKED_END => Action::Adopt {
                entry: c - ADOPT_OFFSET,
            },
            _ => Action::None,
        }
    }

    /// Encodes the action for the client.
    ///
    /// Returns `None` when the payload does not fit its band, i.e. when the
    /// produced code would not decode back to the same action.
    pub fn encode(self) -> Option<u32> {
        let code = match self {
            Action::None => ACTION_NONE,
            Action::MainMenu => ACTION_MAIN_MENU,
            Action::Vendor => ACTION_VENDOR,
            Action::Stable => ACTION_STABLE,
            Action::RemoveSkills => ACTION_REMOVE_SKILLS,
            Action::Browse { category, page } => {
                if page == 0 || page > BROWSE_BAND_WIDTH {
                    return None;
                }
                category.band_start() + page - 1
            }
            Action::Adopt { entry } => entry.checked_add(ADOPT_OFFSET)?,
            Action::TrackedMenu { page } => {
                if page == 0 || page > TRACKED_BAND_WIDTH {
                    return None;
                }
                BAND_TRACKED_MENU_START + page - 1
            }
            Action::Summon { index } => indexed(BAND_SUMMON_START, index)?,
            Action::Rename { index } => indexed(BAND_RENAME_START, index)?,
            Action::Delete { index } => indexed(BAND_DELETE_START, index)?,
        };

        if Action::decode(code) == self {
            Some(code)
        } else {
            None
        }
    }
}

fn browse(category: Category, code: u32) -> Action {
    Action::Browse {
        category,
        page: code - category.band_start() + 1,
    }
}

fn indexed(band_start: u32, index: u32) -> Option<u32> {
    if index >= TRACKED_BAND_WIDTH {
        return None;
    }
    Some(band_start + index)
}

/// Number of pages needed to show `len` items, `page_size` at a time.
pub fn max_page(len: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size) as u32
}

/// Whether `position` (1-based) is shown on `page` (1-based).
pub fn on_page(position: usize, page: u32, page_size: usize) -> bool {
    let page = page as usize;
    position > page.saturating_sub(1) * page_size && position <= page * page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fixed_codes() {
        assert_eq!(Action::decode(0), Action::None);
        assert_eq!(Action::decode(3), Action::Vendor);
        assert_eq!(Action::decode(14), Action::Stable);
        assert_eq!(Action::decode(50), Action::MainMenu);
        assert_eq!(Action::decode(80), Action::RemoveSkills);
    }

    #[test]
    fn unrecognised_codes_are_inert() {
        for code in [1, 2, 49, 51, 79, 81, 200, 500] {
            assert_eq!(Action::decode(code), Action::None, "code {code}");
        }
    }

    #[test]
    fn browse_band_boundaries() {
        let cases = [
            (500, Action::None),
            (501, Action::Browse { category: Category::Normal, page: 1 }),
            (600, Action::Browse { category: Category::Normal, page: 100 }),
            (601, Action::Browse { category: Category::Exotic, page: 1 }),
            (700, Action::Browse { category: Category::Exotic, page: 100 }),
            (701, Action::Browse { category: Category::Rare, page: 1 }),
            (800, Action::Browse { category: Category::Rare, page: 100 }),
            (801, Action::Browse { category: Category::RareExotic, page: 1 }),
            (900, Action::Browse { category: Category::RareExotic, page: 100 }),
        ];
        for (code, expected) in cases {
            assert_eq!(Action::decode(code), expected, "code {code}");
        }
    }

    #[test]
    fn adopt_and_tracked_band_boundaries() {
        let cases = [
            (901, Action::Adopt { entry: 0 }),
            (999, Action::Adopt { entry: 98 }),
            (1000, Action::TrackedMenu { page: 1 }),
            (1999, Action::TrackedMenu { page: 1000 }),
            (2000, Action::Summon { index: 0 }),
            (2999, Action::Summon { index: 999 }),
            (3000, Action::Rename { index: 0 }),
            (3999, Action::Rename { index: 999 }),
            (4000, Action::Delete { index: 0 }),
            (4999, Action::Delete { index: 999 }),
            (5000, Action::Adopt { entry: 4099 }),
            (u32::MAX, Action::Adopt { entry: u32::MAX - 901 }),
        ];
        for (code, expected) in cases {
            assert_eq!(Action::decode(code), expected, "code {code}");
        }
    }

    #[test]
    fn browse_pages_round_trip() {
        for category in Category::ALL {
            for page in 1..=100 {
                let action = Action::Browse { category, page };
                let code = action.encode().expect("page fits band");
                assert_eq!(Action::decode(code), action);
            }
            assert_eq!(Action::Browse { category, page: 0 }.encode(), None);
            assert_eq!(Action::Browse { category, page: 101 }.encode(), None);
        }
    }

    #[test]
    fn adopt_encodes_entry_plus_offset() {
        for entry in 0..99 {
            let code = Action::Adopt { entry }.encode().expect("below tracked bands");
            assert_eq!(code, entry + 901);
            assert_eq!(code - ADOPT_OFFSET, entry);
        }
        assert_eq!(Action::Adopt { entry: 4099 }.encode(), Some(5000));
    }

    #[test]
    fn adopt_codes_colliding_with_tracked_bands_are_rejected() {
        assert_eq!(Action::Adopt { entry: 99 }.encode(), None);
        assert_eq!(Action::Adopt { entry: 1000 }.encode(), None);
        assert_eq!(Action::Adopt { entry: 4098 }.encode(), None);
        assert_eq!(Action::Adopt { entry: u32::MAX }.encode(), None);
    }

    #[test]
    fn tracked_actions_use_menu_index() {
        assert_eq!(Action::Summon { index: 4 }.encode(), Some(2004));
        assert_eq!(Action::Rename { index: 4 }.encode(), Some(3004));
        assert_eq!(Action::Delete { index: 4 }.encode(), Some(4004));
        assert_eq!(Action::Delete { index: 1000 }.encode(), None);
        assert_eq!(Action::TrackedMenu { page: 3 }.encode(), Some(1002));
    }

    #[test]
    fn max_page_is_ceiling() {
        assert_eq!(max_page(0, 13), 0);
        assert_eq!(max_page(1, 13), 1);
        assert_eq!(max_page(13, 13), 1);
        assert_eq!(max_page(14, 13), 2);
        assert_eq!(max_page(25, 13), 2);
        assert_eq!(max_page(26, 13), 2);
        assert_eq!(max_page(27, 13), 3);
    }

    #[test]
    fn page_window_is_half_open_from_below() {
        assert!(!on_page(0, 1, 13));
        assert!(on_page(1, 1, 13));
        assert!(on_page(13, 1, 13));
        assert!(!on_page(14, 1, 13));
        assert!(on_page(14, 2, 13));
        assert!(on_page(26, 2, 13));
    }
}
