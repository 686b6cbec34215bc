//! The beastmaster NPC.
//!
//! [`Beastmaster`] holds everything shared between sessions: configuration,
//! the pet catalog, tracked-pet storage with its cache, the name denylist
//! and summon cooldowns. It is built once at startup and shared by
//! reference; per-player state lives in each player's [`Session`].

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use bm_core::action::{max_page, Action};
use bm_core::constants::{
    CLASS_HUNTER, HUNTER_SPELLS, PET_MAX_HAPPINESS, SOUND_BEASTMASTER_HOWL, SPELL_BEAST_MASTERY,
    SPELL_CALL_PET, SPELL_TAME_BEAST, TRACKED_PAGE_SIZE,
};
use bm_core::types::{Category, PlayerId};
use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, CatalogStore, LoadError};
use crate::commands::{Command, SummonCooldowns};
use crate::config::BeastmasterConfig;
use crate::denylist::Denylist;
use crate::eligibility;
use crate::host::{HostAction, PlayerHandle, Reply};
use crate::lifecycle::{check_name, CreateError, RenameError, TrackedPets};
use crate::menu::{self, RootOptions};
use crate::repository::{TameSource, TamedPetRepository};
use crate::session::{Screen, Session};

/// How long a summoned beastmaster stays.
pub const NPC_SUMMON_DURATION: Duration = Duration::from_secs(2 * 60);

const MSG_HAS_PET: &str = "First you must abandon or stable your current pet!";
const MSG_RENAME_PROMPT: &str =
    "To rename your pet, type: .petname rename <newname> in chat. To cancel, type: .petname cancel";
const MSG_DEFAULT_LOGIN: &str = "|cff00ff00[Beastmaster]|r Use |cff00ffff.bm|r or |cff00ffff.beastmaster|r to summon the Beastmaster NPC and manage your pets!";

type ConfigSource = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct Beastmaster {
    config: RwLock<Arc<BeastmasterConfig>>,
    config_source: ConfigSource,
    tames: Arc<dyn TameSource>,
    catalog: CatalogStore,
    pets: TrackedPets,
    denylist: Denylist,
    cooldowns: SummonCooldowns,
}

impl Beastmaster {
    /// Creates the context. The catalog stays empty until
    /// [`Beastmaster::load_system`] or the first interaction loads it.
    ///
    /// `reload` re-reads the configuration from the process environment
    /// unless another source is set with [`Beastmaster::with_config_source`].
    pub fn new(
        config: BeastmasterConfig,
        tames: Arc<dyn TameSource>,
        pets: Arc<dyn TamedPetRepository>,
    ) -> Self {
        Beastmaster {
            denylist: Denylist::new(config.profanity_file.clone()),
            config: RwLock::new(Arc::new(config)),
            config_source: Box::new(|key| std::env::var(key).ok()),
            tames,
            catalog: CatalogStore::new(),
            pets: TrackedPets::new(pets),
            cooldowns: SummonCooldowns::new(),
        }
    }

    pub fn with_config_source<F>(mut self, source: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.config_source = Box::new(source);
        self
    }

    pub fn config(&self) -> Arc<BeastmasterConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.snapshot()
    }

    pub fn tracked_pets(&self) -> &TrackedPets {
        &self.pets
    }

    /// Loads the catalog with the current configuration.
    pub fn load_system(&self) -> Result<Arc<Catalog>, LoadError> {
        let config = self.config();
        self.catalog
            .load(self.tames.as_ref(), &config.rare_pets, &config.rare_exotic_pets)
    }

    /// Re-reads the configuration, then reloads the catalog.
    pub fn reload(&self) -> Result<Arc<Catalog>, LoadError> {
        let (config, warnings) = BeastmasterConfig::from_lookup(|key| (self.config_source)(key));
        for warning in &warnings {
            warning.log();
        }
        self.denylist.set_path(config.profanity_file.clone());
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        self.load_system()
    }

    /// The catalog, loading it first if nothing is loaded yet.
    fn ensure_catalog(&self) -> Arc<Catalog> {
        let catalog = self.catalog.snapshot();
        if !catalog.is_empty() {
            return catalog;
        }
        log::warn!("Beastmaster: Pet lists empty; performing lazy load.");
        self.load_system().unwrap_or_else(|_| self.catalog.snapshot())
    }

    // ---------------------------------------------------------------------
    //  Gossip
    // ---------------------------------------------------------------------

    /// The player opened the NPC's gossip window.
    pub fn gossip_hello(&self, player: &mut dyn PlayerHandle, session: &mut Session) -> Reply {
        let config = self.config();
        if !config.enabled {
            return Reply::none();
        }
        self.main_menu(&config, player, session)
    }

    /// The player chose the line carrying `code`.
    pub fn gossip_select(&self, player: &mut dyn PlayerHandle, session: &mut Session, code: u32) -> Reply {
        self.gossip_select_at(player, session, code, Utc::now())
    }

    /// [`Beastmaster::gossip_select`] with an explicit clock, used for the
    /// adoption timestamp.
    pub fn gossip_select_at(
        &self,
        player: &mut dyn PlayerHandle,
        session: &mut Session,
        code: u32,
        now: DateTime<Utc>,
    ) -> Reply {
        let config = self.config();
        if !config.enabled {
            return Reply::none();
        }
        let catalog = self.ensure_catalog();

        let reply = match Action::decode(code) {
            Action::None => Reply::none(),
            Action::MainMenu => self.main_menu(&config, player, session),
            Action::Vendor => Reply::host(HostAction::OpenVendor),
            Action::Stable => Reply::host(HostAction::OpenStable),
            Action::RemoveSkills => {
                for spell in HUNTER_SPELLS {
                    player.remove_spell(spell);
                }
                player.remove_spell(SPELL_BEAST_MASTERY);
                Reply::none().closed()
            }
            Action::Browse { category, page } => {
                self.browse(&config, &catalog, player, session, category, page)
            }
            Action::Adopt { entry } => self.adopt(&config, &catalog, player, entry, now),
            Action::TrackedMenu { page } => self.tracked_menu(&config, &catalog, player, session, page),
            Action::Summon { index } => self.summon_tracked(player, session, index),
            Action::Rename { index } => match session.resolve(index) {
                Some(entry) => {
                    session.awaiting_rename = Some(entry);
                    Reply::message(MSG_RENAME_PROMPT)
                        .with_whisper(MSG_RENAME_PROMPT)
                        .closed()
                }
                None => stale(player.id(), index),
            },
            Action::Delete { index } => self.delete_tracked(&catalog, player, session, index),
        };

        if reply.close {
            session.screen = Screen::Closed;
        }
        reply
    }

    fn main_menu(
        &self,
        config: &BeastmasterConfig,
        player: &mut dyn PlayerHandle,
        session: &mut Session,
    ) -> Reply {
        let catalog = self.ensure_catalog();
        let profile = player.profile();

        if let Some(denial) = eligibility::evaluate(&profile, config, &catalog).message(&profile.name) {
            session.screen = Screen::Closed;
            return Reply::whisper(denial);
        }

        let options = RootOptions {
            show_exotic: eligibility::can_browse_exotic(&profile, config),
            show_unlearn: !profile.is_hunter() && player.has_spell(SPELL_CALL_PET),
            show_tracked: config.track_tamed_pets,
            show_stable: profile.is_hunter(),
        };
        session.screen = Screen::Root;
        Reply::menu(menu::root_menu(options)).with_sound(SOUND_BEASTMASTER_HOWL)
    }

    fn browse(
        &self,
        config: &BeastmasterConfig,
        catalog: &Catalog,
        player: &mut dyn PlayerHandle,
        session: &mut Session,
        category: Category,
        page: u32,
    ) -> Reply {
        let profile = player.profile();
        if let Some(denial) = eligibility::evaluate(&profile, config, catalog).message(&profile.name) {
            return Reply::whisper(denial);
        }
        if category.is_exotic() && !eligibility::can_browse_exotic(&profile, config) {
            log::debug!(
                "Beastmaster: Player {} asked for {} pets without access",
                player.id(),
                category.label()
            );
            return Reply::none();
        }

        let mut reply = Reply::none();
        if category.is_exotic() && !profile.has_beast_mastery() {
            player.learn_spell(SPELL_BEAST_MASTERY);
            reply = reply.with_whisper(format!(
                "I have taught you the art of Beast Mastery, {}.",
                profile.name
            ));
        }

        let owned = if config.track_tamed_pets {
            self.pets.owned_entries(player.id())
        } else {
            Arc::default()
        };
        reply.menu = Some(menu::browse_page(category, page, catalog.partition(category), &owned));
        session.screen = Screen::Browse { category, page };
        reply
    }

    fn adopt(
        &self,
        config: &BeastmasterConfig,
        catalog: &Catalog,
        player: &mut dyn PlayerHandle,
        entry: u32,
        now: DateTime<Utc>,
    ) -> Reply {
        let Some(definition) = catalog.get(entry) else {
            log::debug!("Beastmaster: Player {} tried to adopt unknown entry {entry}", player.id());
            return Reply::none();
        };

        let profile = player.profile();
        if let Some(denial) = eligibility::evaluate(&profile, config, catalog).message(&profile.name) {
            return Reply::whisper(denial);
        }
        if player.has_pet() {
            return Reply::whisper(MSG_HAS_PET);
        }
        if let Some(denial) =
            eligibility::check_adoption(&profile, config, definition.rarity).message(&profile.name)
        {
            return Reply::whisper(denial);
        }
        if let Err(e) = self.pets.check_quota(config, player.id()) {
            return Reply::whisper(e.to_string());
        }

        let spell = if profile.is_hunter() {
            SPELL_TAME_BEAST
        } else {
            SPELL_CALL_PET
        };
        let Some(pet_name) = player.create_pet(entry, spell) else {
            return Reply::none().with_whisper(MSG_HAS_PET);
        };

        let mut reply = Reply::none();
        if config.track_tamed_pets {
            match self
                .pets
                .create(config, player.id(), entry, &pet_name, now.timestamp_millis())
            {
                Ok(()) | Err(CreateError::AlreadyTracked) => {}
                Err(e) => reply = reply.with_message(e.to_string()),
            }
        }

        player.set_pet_happiness(PET_MAX_HAPPINESS);

        if profile.class_id != CLASS_HUNTER && !player.has_spell(SPELL_CALL_PET) {
            for spell in HUNTER_SPELLS {
                if !player.has_spell(spell) {
                    player.learn_spell(spell);
                }
            }
        }

        reply
            .with_whisper(format!(
                "A fine choice {}! Take good care of your {} and you will never face your enemies alone.",
                profile.name, pet_name
            ))
            .closed()
    }

    fn tracked_menu(
        &self,
        config: &BeastmasterConfig,
        catalog: &Catalog,
        player: &mut dyn PlayerHandle,
        session: &mut Session,
        page: u32,
    ) -> Reply {
        if !config.track_tamed_pets {
            return Reply::message("Pet tracking is disabled.").closed();
        }
        self.render_tracked(catalog, player.id(), session, page)
    }

    fn render_tracked(&self, catalog: &Catalog, owner: PlayerId, session: &mut Session, page: u32) -> Reply {
        let records = self.pets.list(owner);
        let (menu, map) = menu::tracked_page(page, &records, catalog);
        session.set_menu_map(map);
        session.screen = Screen::Tracked { page };
        Reply::menu(menu)
    }

    fn summon_tracked(&self, player: &mut dyn PlayerHandle, session: &mut Session, index: u32) -> Reply {
        let Some(entry) = session.resolve(index) else {
            return stale(player.id(), index);
        };
        if player.has_pet() {
            log::debug!("Beastmaster: Player {} tried to summon pet {entry} with a companion out", player.id());
            return Reply::none();
        }

        if player.create_pet(entry, SPELL_CALL_PET).is_none() {
            return Reply::whisper("Failed to summon pet.");
        }
        if let Some(name) = self.pets.stored_name(player.id(), entry) {
            player.set_pet_name(&name);
        }
        player.set_pet_happiness(PET_MAX_HAPPINESS);
        Reply::whisper("Your tracked pet has been summoned!")
    }

    fn delete_tracked(
        &self,
        catalog: &Catalog,
        player: &mut dyn PlayerHandle,
        session: &mut Session,
        index: u32,
    ) -> Reply {
        let (Some(entry), Some(page)) = (session.resolve(index), session.menu_map().map(|m| m.page()))
        else {
            return stale(player.id(), index);
        };
        let owner = player.id();

        let removed = match self.pets.delete(owner, entry) {
            Ok(removed) => removed,
            Err(_) => {
                return Reply::message("Your pet could not be deleted. Please try again later.").closed()
            }
        };
        if session.awaiting_rename == Some(entry) {
            session.awaiting_rename = None;
        }

        let total = self.pets.list(owner).len();
        let page = page.clamp(1, max_page(total, TRACKED_PAGE_SIZE).max(1));
        let reply = self.render_tracked(catalog, owner, session, page);
        if removed {
            reply.with_message(format!("Tracked pet deleted (entry {entry})."))
        } else {
            reply
        }
    }

    // ---------------------------------------------------------------------
    //  Commands
    // ---------------------------------------------------------------------

    /// Handles a chat line typed by `player`.
    ///
    /// Returns `None` when the line is not a beastmaster command.
    pub fn handle_command(&self, player: &mut dyn PlayerHandle, session: &mut Session, line: &str) -> Option<Reply> {
        self.handle_command_at(player, session, line, Utc::now())
    }

    pub fn handle_command_at(
        &self,
        player: &mut dyn PlayerHandle,
        session: &mut Session,
        line: &str,
        now: DateTime<Utc>,
    ) -> Option<Reply> {
        let command = Command::parse(line)?;
        if command == Command::Reload {
            if !player.is_game_master() {
                return Some(Reply::message("Insufficient privileges."));
            }
            return Some(self.reload_reply());
        }

        let config = self.config();
        if !config.enabled {
            return None;
        }

        let reply = match command {
            Command::PetnameRename(args) => self.rename_command(&config, player.id(), session, &args),
            Command::PetnameCancel => match session.awaiting_rename.take() {
                Some(_) => Reply::message("Pet renaming cancelled."),
                None => Reply::message("You are not renaming a pet right now."),
            },
            Command::SummonNpc => self.summon_npc(&config, player, now),
            Command::Reload => self.reload_reply(),
        };
        Some(reply)
    }

    /// Handles a line typed on the server console. Only `reload` applies,
    /// and the leading `.` is optional there.
    pub fn console_command(&self, line: &str) -> Option<Reply> {
        let line = line.trim_start();
        let parsed = match line.starts_with('.') {
            true => Command::parse(line),
            false => Command::parse(&format!(".{line}")),
        };
        match parsed? {
            Command::Reload => Some(self.reload_reply()),
            _ => None,
        }
    }

    fn reload_reply(&self) -> Reply {
        match self.reload() {
            Ok(_) => Reply::message("Beastmaster configuration & pet lists reloaded."),
            Err(e) => Reply::message(format!("Beastmaster reload failed: {e}")),
        }
    }

    fn rename_command(
        &self,
        config: &BeastmasterConfig,
        owner: PlayerId,
        session: &mut Session,
        args: &str,
    ) -> Reply {
        let Some(entry) = session.awaiting_rename else {
            return Reply::message(
                "You are not renaming a pet right now. Use the Beastmaster NPC to start renaming.",
            );
        };

        let denylist = config.profanity_filter.then_some(&self.denylist);
        let name = match check_name(args, denylist) {
            Ok(name) => name,
            Err(e) => return Reply::message(e.to_string()),
        };

        match self.pets.rename(owner, entry, &name) {
            Ok(()) => {
                session.awaiting_rename = None;
                session.clear_menu_map();
                Reply::message(format!("Pet renamed to '{name}'."))
            }
            Err(e @ RenameError::NotFound) => {
                session.awaiting_rename = None;
                session.clear_menu_map();
                Reply::message(e.to_string())
            }
            Err(e) => Reply::message(e.to_string()),
        }
    }

    fn summon_npc(&self, config: &BeastmasterConfig, player: &mut dyn PlayerHandle, now: DateTime<Utc>) -> Reply {
        if let Err(remaining) = self
            .cooldowns
            .try_start(player.id(), now, config.summon_cooldown_secs)
        {
            return Reply::message(format!(
                "You must wait {remaining} seconds before summoning the Beastmaster again."
            ));
        }

        if player.summon_npc(config.npc_entry, NPC_SUMMON_DURATION) {
            Reply::message("The Beastmaster has arrived and will remain for 2 minutes.")
        } else {
            log::error!(
                "Beastmaster: Could not summon NPC {} for player {}",
                config.npc_entry,
                player.id()
            );
            Reply::message("Failed to summon the Beastmaster. Please contact an admin.")
        }
    }

    // ---------------------------------------------------------------------
    //  Player hooks
    // ---------------------------------------------------------------------

    /// Login notice pointing at the summon command.
    pub fn on_login(&self, player: &dyn PlayerHandle) -> Reply {
        let config = self.config();
        if !config.enabled || !config.show_login_notice {
            return Reply::none();
        }
        if config.hunter_only && player.class_id() != CLASS_HUNTER {
            return Reply::none();
        }

        let notice = if config.login_message.is_empty() {
            MSG_DEFAULT_LOGIN.to_string()
        } else {
            config.login_message.clone()
        };
        let mut reply = Reply::message(notice);
        if player.is_game_master() {
            reply = reply.with_message(format!(
                "|cffffa500[GM Notice]|r You can also use |cff00ffff.npc add {}|r to spawn the Beastmaster NPC anywhere, and |cff00ffff.npc save|r to make it permanent.",
                config.npc_entry
            ));
        }
        reply
    }

    /// Per-tick player hook. Keeps hunter pets content when configured.
    pub fn on_player_update(&self, player: &mut dyn PlayerHandle) {
        let config = self.config();
        if config.enabled && config.keep_pet_happy && player.has_hunter_pet() {
            player.set_pet_happiness(PET_MAX_HAPPINESS);
        }
    }
}

fn stale(player: PlayerId, index: u32) -> Reply {
    log::debug!("Beastmaster: Player {player} used stale menu index {index}");
    Reply::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[test]
    fn reload_reads_the_configured_source() {
        let repo = Arc::new(InMemoryRepository::new());
        let bm = Beastmaster::new(BeastmasterConfig::default(), repo.clone(), repo)
            .with_config_source(|key| (key == "BEASTMASTER_MIN_LEVEL").then(|| "42".to_string()));
        assert_eq!(bm.config().min_level, 10);

        assert_eq!(bm.reload().unwrap_err(), LoadError::Empty);
        assert_eq!(bm.config().min_level, 42);
    }

    #[test]
    fn console_may_reload() {
        let repo = Arc::new(InMemoryRepository::new());
        let bm = Beastmaster::new(BeastmasterConfig::default(), repo.clone(), repo)
            .with_config_source(|_| None);
        let reply = bm.console_command(".beastmaster reload").unwrap();
        assert_eq!(
            reply.messages,
            vec!["Beastmaster reload failed: No pets loaded! Check beastmaster_tames table/import."]
        );
        assert!(bm.console_command("bm reload").is_some());
        assert!(bm.console_command(".bm").is_none());
        assert!(bm.console_command("bm").is_none());
    }
}
