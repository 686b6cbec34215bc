use bm_core::types::Category;

/// Which beastmaster window the player last saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Closed,
    Root,
    Browse { category: Category, page: u32 },
    Tracked { page: u32 },
}

/// Menu-local indices of the tracked-pet page last rendered, mapped to the
/// entries they stood for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuIndexMap {
    page: u32,
    entries: Vec<u32>,
}

impl MenuIndexMap {
    pub fn new(page: u32, entries: Vec<u32>) -> Self {
        MenuIndexMap { page, entries }
    }

    /// The entry shown at `index`, if the page had that many rows.
    pub fn get(&self, index: u32) -> Option<u32> {
        self.entries.get(index as usize).copied()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Beastmaster state of one logged-in player.
///
/// Owned by the host's session and handed in with every interaction.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub screen: Screen,
    /// Entry of the tracked pet whose new name is expected via
    /// `.petname rename`.
    pub awaiting_rename: Option<u32>,
    menu_map: Option<MenuIndexMap>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu_map(&self) -> Option<&MenuIndexMap> {
        self.menu_map.as_ref()
    }

    /// Replaces the index map with the one of a freshly rendered page.
    pub fn set_menu_map(&mut self, map: MenuIndexMap) {
        self.menu_map = Some(map);
    }

    pub fn clear_menu_map(&mut self) {
        self.menu_map = None;
    }

    /// Resolves a menu-local index against the last rendered page.
    pub fn resolve(&self, index: u32) -> Option<u32> {
        self.menu_map.as_ref().and_then(|map| map.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_rendered_page_is_none() {
        assert_eq!(Session::new().resolve(0), None);
    }

    #[test]
    fn indices_are_scoped_to_the_latest_page() {
        let mut session = Session::new();
        session.set_menu_map(MenuIndexMap::new(1, vec![10, 11, 12]));
        assert_eq!(session.resolve(2), Some(12));

        session.set_menu_map(MenuIndexMap::new(2, vec![20]));
        assert_eq!(session.resolve(0), Some(20));
        assert_eq!(session.resolve(2), None);
        assert_eq!(session.menu_map().map(MenuIndexMap::page), Some(2));

        session.clear_menu_map();
        assert_eq!(session.resolve(0), None);
    }
}
