use serde::{Deserialize, Serialize};

use crate::constants::ACTION_NONE;

/// Icons understood by the client's gossip window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GossipIcon {
    Chat = 0,
    Vendor = 1,
    Taxi = 2,
    Trainer = 3,
    Interact1 = 4,
    Interact2 = 5,
    MoneyBag = 6,
    Talk = 7,
    Tabard = 8,
    Battle = 9,
    Dot = 10,
}

/// A single selectable line of a gossip menu.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GossipItem {
    pub icon: GossipIcon,
    pub label: String,
    /// Action code sent back when the line is chosen. 0 means inert.
    pub action: u32,
}

impl GossipItem {
    pub fn new(icon: GossipIcon, label: impl Into<String>, action: u32) -> Self {
        GossipItem {
            icon,
            label: label.into(),
            action,
        }
    }

    /// A line that does nothing when chosen.
    pub fn inert(label: impl Into<String>) -> Self {
        GossipItem::new(GossipIcon::Chat, label, ACTION_NONE)
    }

    pub fn is_inert(&self) -> bool {
        self.action == ACTION_NONE
    }
}

/// A rendered gossip window: header text id plus its lines, top to bottom.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GossipMenu {
    pub text_id: u32,
    pub items: Vec<GossipItem>,
}

impl GossipMenu {
    pub fn new(text_id: u32) -> Self {
        GossipMenu {
            text_id,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, icon: GossipIcon, label: impl Into<String>, action: u32) {
        self.items.push(GossipItem::new(icon, label, action));
    }

    pub fn push_inert(&mut self, label: impl Into<String>) {
        self.items.push(GossipItem::inert(label));
    }

    /// Finds the first line whose label matches exactly.
    pub fn find(&self, label: &str) -> Option<&GossipItem> {
        self.items.iter().find(|item| item.label == label)
    }

    /// Action codes of every actionable line, in display order.
    pub fn actions(&self) -> Vec<u32> {
        self.items
            .iter()
            .filter(|item| !item.is_inert())
            .map(|item| item.action)
            .collect()
    }
}
