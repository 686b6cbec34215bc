//! Seeding tool: load a JSON list of tameable creatures and write it to the
//! KeyDB tames hash.
//!
//! Usage:
//!   cargo run -p beastmaster-server --bin tames-to-keydb [-- [<file>] [--force] [--skip-if-seeded]]
//!
//! The file may also be given as `--file <path>`. Defaults to
//! `data/tames.json`.
//! If the tames hash already exists, `--force` is required to replace it.
//! Use `--skip-if-seeded` to exit successfully when data is already present.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use bm_core::types::TameRow;

use beastmaster::config::BeastmasterConfig;
use beastmaster::keydb_store::KeyDbStore;

const DEFAULT_SEED_FILE: &str = "data/tames.json";

/// Reads and validates the seed file.
///
/// # Arguments
///
/// * `path` - JSON file holding an array of tame rows.
///
/// # Returns
///
/// * The rows sorted by entry.
/// * `Err` on I/O or parse failure, an empty list, or duplicate entries.
fn load_seed(path: &Path) -> Result<Vec<TameRow>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Read {}: {e}", path.display()))?;
    let mut rows: Vec<TameRow> =
        serde_json::from_str(&text).map_err(|e| format!("Parse {}: {e}", path.display()))?;

    if rows.is_empty() {
        return Err(format!("{} contains no pets", path.display()));
    }

    let mut seen = BTreeSet::new();
    for row in &rows {
        if !seen.insert(row.entry) {
            return Err(format!("Duplicate entry {} in {}", row.entry, path.display()));
        }
        if row.name.trim().is_empty() {
            return Err(format!("Entry {} has no name", row.entry));
        }
    }

    rows.sort_by_key(|row| row.entry);
    Ok(rows)
}

fn main() {
    let _ = dotenvy::dotenv();
    let args: Vec<String> = env::args().collect();

    let mut file: Option<PathBuf> = None;
    let mut force = false;
    let mut skip_if_seeded = false;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --file requires a path argument");
                    process::exit(1);
                }
                file = Some(PathBuf::from(&args[i]));
            }
            "--force" => {
                force = true;
            }
            "--skip-if-seeded" => {
                skip_if_seeded = true;
            }
            other if !other.starts_with("--") && file.is_none() => {
                file = Some(PathBuf::from(other));
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Usage: tames-to-keydb [<file> | --file <path>] [--force] [--skip-if-seeded]");
                process::exit(1);
            }
        }
        i += 1;
    }

    let file = file.unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_FILE));

    println!("=== Beastmaster: tames → KeyDB Seeding Tool ===");
    println!("Loading from: {}", file.display());

    let t = Instant::now();
    let rows = load_seed(&file).unwrap_or_else(|e| {
        eprintln!("Failed to load seed file: {e}");
        process::exit(1);
    });
    println!("  {} pets loaded ({:.2?})", rows.len(), t.elapsed());

    let (config, _) = BeastmasterConfig::from_env();
    println!("\nConnecting to KeyDB at {}...", config.keydb_url);
    let store = KeyDbStore::open(&config.keydb_url).unwrap_or_else(|e| {
        eprintln!("Failed to create KeyDB client: {e}");
        process::exit(1);
    });

    let seeded = store.has_tames().unwrap_or_else(|e| {
        eprintln!("Failed to query KeyDB: {e}");
        process::exit(1);
    });
    if seeded {
        if skip_if_seeded {
            println!("Tames already present in KeyDB; skipping.");
            return;
        }
        if !force {
            eprintln!("Tames already exist in KeyDB. Re-run with --force to replace them.");
            process::exit(1);
        }
        println!("Replacing existing tames (--force).");
    }

    let t = Instant::now();
    match store.save_tames(&rows, seeded) {
        Ok(written) => println!("  Wrote {written} pets ({:.2?})", t.elapsed()),
        Err(e) => {
            eprintln!("Failed to write tames: {e}");
            process::exit(1);
        }
    }
    println!("\nDone.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_rows_are_sorted_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tames.json");

        fs::write(
            &path,
            r#"[{"entry":2,"name":"Bear","family":4,"rarity":""},
                {"entry":1,"name":"Wolf","family":1,"rarity":"rare"}]"#,
        )
        .unwrap();
        let rows = load_seed(&path).unwrap();
        assert_eq!(rows.iter().map(|r| r.entry).collect::<Vec<_>>(), vec![1, 2]);

        fs::write(
            &path,
            r#"[{"entry":1,"name":"Wolf","family":1,"rarity":""},
                {"entry":1,"name":"Wolf","family":1,"rarity":""}]"#,
        )
        .unwrap();
        assert!(load_seed(&path).unwrap_err().contains("Duplicate entry 1"));

        fs::write(&path, "[]").unwrap();
        assert!(load_seed(&path).is_err());
    }
}
