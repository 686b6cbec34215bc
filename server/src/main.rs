//! Standalone beastmaster service.
//!
//! Loads configuration and the pet catalog from KeyDB, then serves console
//! commands from stdin until EOF or `quit`. Game servers embed the library
//! instead and drive [`beastmaster::Beastmaster`] directly.

use std::io::{self, BufRead};
use std::process;
use std::sync::Arc;

use anyhow::Context;
use beastmaster::config::BeastmasterConfig;
use beastmaster::keydb_store::KeyDbStore;
use beastmaster::Beastmaster;

fn run() -> anyhow::Result<()> {
    let (config, warnings) = BeastmasterConfig::from_env();
    for warning in &warnings {
        warning.log();
    }

    if !config.enabled {
        log::info!("Beastmaster is disabled (BEASTMASTER_ENABLE=0).");
    }

    let store = Arc::new(
        KeyDbStore::open(&config.keydb_url)
            .with_context(|| format!("opening KeyDB at {}", config.keydb_url))?,
    );
    let beastmaster = Beastmaster::new(config, store.clone(), store);

    // A failed first load is not fatal; the first interaction retries.
    if let Err(e) = beastmaster.load_system() {
        log::warn!("Beastmaster: Initial load failed: {e}");
    }

    log::info!("Beastmaster ready. Type '.beastmaster reload' to reload, 'quit' to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading console input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        match beastmaster.console_command(line) {
            Some(reply) => {
                for message in &reply.messages {
                    println!("{message}");
                }
            }
            None => println!("Unknown command: {line}"),
        }
    }

    log::info!("Beastmaster shutting down.");
    Ok(())
}

fn main() {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    bm_core::initialize_logger(log::LevelFilter::Info, Some("beastmaster.log")).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {}. Exiting.", e);
        process::exit(1);
    });

    log::info!("Starting Beastmaster v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        log::error!("Beastmaster failed: {e:#}");
        process::exit(1);
    }
}
