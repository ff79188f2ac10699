//! Card Sync - trading card metadata importer
//!
//! Imports FABDB or MTGJSON card data into a local SQLite database and prints
//! how many sets, cards and printings were added.

use card_sync::fabdb::{self, FabDbClient, FabRules};
use card_sync::mtgjson::{self, MtgJsonClient, MtgRules};
use card_sync::summary::added_summary;
use card_sync::{database, entity_counts, Game, SetFilter};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;

/// Import trading card metadata into SQLite
#[derive(Parser, Debug)]
#[command(name = "card_sync")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import Flesh and Blood cards from FABDB
    Fab {
        /// FABDB card listing endpoint
        #[arg(long, default_value = fabdb::API_URL)]
        api_url: String,
    },
    /// Import Magic: The Gathering cards from MTGJSON
    Mtg {
        /// Only import these set codes (repeatable; default: all sets)
        #[arg(long = "set", value_name = "CODE")]
        sets: Vec<String>,

        /// Zipped AllSets dump
        #[arg(long, default_value = mtgjson::MTG_JSON_URL)]
        archive_url: String,

        /// Mirror tried when the archive URL can't be reached
        #[arg(long, default_value = mtgjson::FALLBACK_MTG_JSON_URL)]
        fallback_url: String,
    },
}

/// Returns `card_sync/cards.db` under the platform data directory
///
/// Falls back to the working directory when the platform has none.
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("card_sync")
        .join("cards.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);
    log::info!("Database path: {}", db_path.display());

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let mut conn = match database::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&mut conn, args.command).await {
        log::error!("Import failed, no changes were written: {}", e);
        std::process::exit(1);
    }
}

/// Run one import and print the summary
async fn run(conn: &mut Connection, command: Command) -> card_sync::Result<()> {
    let game = match command {
        Command::Fab { .. } => Game::Fab,
        Command::Mtg { .. } => Game::Mtg,
    };
    let before = entity_counts(conn, game)?;

    match command {
        Command::Fab { api_url } => {
            println!("Beginning import of all cards.");
            let client = FabDbClient::with_api_url(api_url);
            fabdb::import_cards(conn, &client, FabRules::default()).await?;
        }
        Command::Mtg {
            sets,
            archive_url,
            fallback_url,
        } => {
            let filter = SetFilter::from_codes(sets);
            match &filter {
                SetFilter::All => println!("Beginning import of all cards."),
                SetFilter::Only(codes) => println!(
                    "Beginning import of {} set(s): {}.",
                    codes.len(),
                    codes.iter().cloned().collect::<Vec<_>>().join(", ")
                ),
            }
            let client = MtgJsonClient::with_urls(archive_url, fallback_url);
            mtgjson::import_cards(conn, &client, &filter, MtgRules::default()).await?;
        }
    }
    println!("Import complete.");

    let after = entity_counts(conn, game)?;
    println!("{}", added_summary(before, after));
    Ok(())
}
