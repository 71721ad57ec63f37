/// Snapshot admin tool - inspect, export or reset the persisted store
///
/// `show` and `export` only read; `reset` is the one command that writes.
///
/// Usage:
///   cargo run --bin house-snapshot [--db-path <path>] [--key <key>] <show|export|reset>
///
/// Options:
///   --db-path: Path to SQLite database (defaults to HOUSE_DB_PATH or ~/Library/Application Support/HouseOfSwass/house.db)
///   --key: Storage key the snapshot lives under (defaults to HOUSE_STORAGE_KEY or house-of-swass-storage)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use house_schemas::StoreSnapshot;
use house_store::{decode_snapshot, views, SnapshotStorage, SqliteStorage, Store, StoreConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "house-snapshot")]
#[command(about = "Inspect, export or reset the persisted House of Swass store")]
struct Args {
    /// Path to SQLite database file
    #[arg(long, short)]
    db_path: Option<PathBuf>,

    /// Storage key holding the snapshot document
    #[arg(long, short)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print slice counts, session and mode
    Show,
    /// Print the persisted JSON document
    Export {
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Restore the seeded first-run contents
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = StoreConfig::from_env();
    if let Some(db_path) = args.db_path {
        config.db_path = db_path;
    }
    if let Some(key) = args.key {
        config.storage_key = key;
    }

    info!("Database: {}", config.db_path.display());
    let storage = SqliteStorage::new(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;

    match args.command {
        Command::Show => {
            let Some(document) = storage.load(&config.storage_key)? else {
                println!("nothing stored under {}", config.storage_key);
                return Ok(());
            };
            let snapshot = decode_snapshot(&document)
                .with_context(|| format!("decoding snapshot under {}", config.storage_key))?;
            print_summary(&snapshot);
        }
        Command::Export { pretty } => {
            let document = storage
                .load(&config.storage_key)?
                .with_context(|| format!("nothing stored under {}", config.storage_key))?;
            if pretty {
                let value: serde_json::Value = serde_json::from_str(&document)
                    .with_context(|| format!("parsing document under {}", config.storage_key))?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", document);
            }
        }
        Command::Reset => {
            let store = Store::open(config, storage);
            store.reset_to_seed();
            println!("reset {} to seeded defaults", store.config().storage_key);
        }
    }

    Ok(())
}

fn print_summary(snapshot: &StoreSnapshot) {
    let stats = views::dashboard_stats(snapshot);
    println!("places:          {}", snapshot.places.len());
    println!("memories:        {}", snapshot.memories.len());
    println!("friends:         {}", snapshot.friends.len());
    println!("tales:           {}", snapshot.tales.len());
    println!(
        "goals:           {} ({}% complete)",
        snapshot.goals.len(),
        stats.goal_progress
    );
    println!("moodboard items: {}", snapshot.moodboard_items.len());
    println!(
        "taste profile:   {}",
        snapshot
            .taste_profile
            .as_ref()
            .map(|p| p.persona.as_str())
            .unwrap_or("-")
    );
    println!("mode:            {}", snapshot.current_mode);
    match &snapshot.user {
        Some(user) if snapshot.is_authenticated => {
            println!("session:         {} <{}>", user.name, user.email)
        }
        _ => println!("session:         signed out"),
    }
}
