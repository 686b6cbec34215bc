//! Chat commands understood by the beastmaster.
//!
//! - `.petname rename <name>` / `.petname cancel`
//! - `.beastmaster reload` (game masters and console only)
//! - `.beastmaster` / `.bm` to call the NPC, rate limited per player

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use bm_core::types::PlayerId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Everything after `rename`.
    PetnameRename(String),
    PetnameCancel,
    Reload,
    SummonNpc,
}

impl Command {
    /// Parses a chat line. Returns `None` for anything that is not ours,
    /// including lines without the leading `.`.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim_start().strip_prefix('.')?;
        let (head, rest) = split_word(line);

        match head.to_ascii_lowercase().as_str() {
            "petname" => {
                let (sub, args) = split_word(rest);
                match sub.to_ascii_lowercase().as_str() {
                    "rename" => Some(Command::PetnameRename(args.to_string())),
                    "cancel" => Some(Command::PetnameCancel),
                    _ => None,
                }
            }
            "beastmaster" | "bm" => {
                let (sub, _) = split_word(rest);
                match sub.to_ascii_lowercase().as_str() {
                    "" => Some(Command::SummonNpc),
                    "reload" => Some(Command::Reload),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], text[at..].trim_start()),
        None => (text, ""),
    }
}

/// Last NPC summon per player. Kept in memory only.
#[derive(Default)]
pub struct SummonCooldowns {
    last: Mutex<HashMap<PlayerId, DateTime<Utc>>>,
}

impl SummonCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a cooldown for `player` unless one is running. Expired
    /// cooldowns of every player are dropped on the way.
    ///
    /// # Returns
    ///
    /// `Err` with the whole seconds left when still cooling down.
    pub fn try_start(&self, player: PlayerId, now: DateTime<Utc>, cooldown_secs: u64) -> Result<(), u64> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let cooldown = i64::try_from(cooldown_secs).unwrap_or(i64::MAX);
        let elapsed = |at: &DateTime<Utc>| now.signed_duration_since(*at).num_seconds().max(0);

        last.retain(|_, at| elapsed(at) < cooldown);
        if let Some(previous) = last.get(&player) {
            return Err((cooldown - elapsed(previous)) as u64);
        }

        if cooldown > 0 {
            last.insert(player, now);
        }
        Ok(())
    }

    /// Number of players still cooling down as of the last summon.
    pub fn len(&self) -> usize {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
