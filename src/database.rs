//! Database schema and bookkeeping queries
//!
//! Uses parameterized queries exclusively (no SQL string concatenation of input).
//! All import writes are transactional, see the `reconcile` modules.

use rusqlite::Connection;
use std::path::Path;

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// Which game's tables to address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    /// Flesh and Blood, imported from FABDB
    Fab,
    /// Magic: The Gathering, imported from MTGJSON
    Mtg,
}

impl Game {
    fn tables(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Game::Fab => ("fab_sets", "fab_cards", "fab_printings"),
            Game::Mtg => ("mtg_sets", "mtg_cards", "mtg_printings"),
        }
    }
}

/// Open (or create) the database file and initialise the schema
pub fn open(path: &Path) -> DbResult<Connection> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Initialize the database schema
///
/// Creates tables for both games if they don't exist and turns on foreign key
/// enforcement so deleted cards take their printings with them.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        -- Flesh and Blood (FABDB)
        CREATE TABLE IF NOT EXISTS fab_sets (
            id INTEGER PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS fab_cards (
            id INTEGER PRIMARY KEY,
            identifier TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            text TEXT,
            keywords TEXT,
            attack TEXT,
            defense TEXT,
            resource TEXT,
            cost TEXT,
            intellect TEXT,
            life TEXT,
            rarity TEXT
        );

        CREATE TABLE IF NOT EXISTS fab_printings (
            id INTEGER PRIMARY KEY,
            sku TEXT NOT NULL UNIQUE,
            card_id INTEGER NOT NULL REFERENCES fab_cards(id) ON DELETE CASCADE,
            set_id INTEGER NOT NULL REFERENCES fab_sets(id) ON DELETE CASCADE,
            rarity TEXT,
            finish TEXT,
            printing_id INTEGER,
            image_url TEXT,
            language TEXT NOT NULL DEFAULT 'en'
        );

        CREATE INDEX IF NOT EXISTS idx_fab_printings_card ON fab_printings(card_id);

        -- Magic: The Gathering (MTGJSON)
        CREATE TABLE IF NOT EXISTS mtg_sets (
            id INTEGER PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS mtg_cards (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            mana_cost TEXT NOT NULL DEFAULT '',
            text TEXT NOT NULL DEFAULT '',
            power TEXT NOT NULL DEFAULT '',
            toughness TEXT NOT NULL DEFAULT '',
            loyalty INTEGER
        );

        CREATE TABLE IF NOT EXISTS mtg_supertypes (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS mtg_types (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS mtg_subtypes (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS mtg_card_supertypes (
            card_id INTEGER NOT NULL REFERENCES mtg_cards(id) ON DELETE CASCADE,
            supertype_id INTEGER NOT NULL REFERENCES mtg_supertypes(id) ON DELETE CASCADE,
            PRIMARY KEY (card_id, supertype_id)
        );

        CREATE TABLE IF NOT EXISTS mtg_card_types (
            card_id INTEGER NOT NULL REFERENCES mtg_cards(id) ON DELETE CASCADE,
            type_id INTEGER NOT NULL REFERENCES mtg_types(id) ON DELETE CASCADE,
            PRIMARY KEY (card_id, type_id)
        );

        CREATE TABLE IF NOT EXISTS mtg_card_subtypes (
            card_id INTEGER NOT NULL REFERENCES mtg_cards(id) ON DELETE CASCADE,
            subtype_id INTEGER NOT NULL REFERENCES mtg_subtypes(id) ON DELETE CASCADE,
            PRIMARY KEY (card_id, subtype_id)
        );

        -- Not unique: the same artist name can legitimately be two people
        CREATE TABLE IF NOT EXISTS mtg_artists (
            id INTEGER PRIMARY KEY,
            full_name TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_mtg_artists_name ON mtg_artists(full_name);

        CREATE TABLE IF NOT EXISTS mtg_printings (
            id INTEGER PRIMARY KEY,
            card_id INTEGER NOT NULL REFERENCES mtg_cards(id) ON DELETE CASCADE,
            set_id INTEGER NOT NULL REFERENCES mtg_sets(id) ON DELETE CASCADE,
            rarity TEXT NOT NULL,
            flavor_text TEXT NOT NULL DEFAULT '',
            artist_id INTEGER REFERENCES mtg_artists(id) ON DELETE SET NULL,
            number TEXT NOT NULL DEFAULT '',
            multiverse_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_mtg_printings_card ON mtg_printings(card_id);
        CREATE INDEX IF NOT EXISTS idx_mtg_printings_set ON mtg_printings(set_id);
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

/// Row counts of the tracked entity tables for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub sets: i64,
    pub cards: i64,
    pub printings: i64,
}

/// Count sets, cards and printings for a game
pub fn entity_counts(conn: &Connection, game: Game) -> DbResult<EntityCounts> {
    let (sets, cards, printings) = game.tables();
    Ok(EntityCounts {
        sets: count_rows(conn, sets)?,
        cards: count_rows(conn, cards)?,
        printings: count_rows(conn, printings)?,
    })
}

/// `table` is always one of the static names above, never user input
fn count_rows(conn: &Connection, table: &str) -> DbResult<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
}
