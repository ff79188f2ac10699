//! SQLite access for the `mtg_*` tables

use super::rarity::Rarity;
use crate::cache::{EntityKind, EntitySource, RowId};
use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// MTGJSON sets, keyed by exact code
pub struct MtgSetCode;

impl EntityKind for MtgSetCode {
    /// Display name of the set
    type Fields = String;
    const LABEL: &'static str = "MTG set";

    fn normalize(key: &str) -> String {
        key.to_string()
    }
}

/// Card supertypes (`Legendary`, `Basic`, ...)
pub struct Supertype;

/// Card types (`Creature`, `Planeswalker`, ...)
pub struct CardType;

/// Card subtypes (`Elf`, `Tamiyo`, ...)
pub struct Subtype;

/// Taxonomy tables share one shape: `(id, name UNIQUE)` plus a card link table
pub trait Taxonomy: EntityKind<Fields = ()> {
    const TABLE: &'static str;
    const LINK_TABLE: &'static str;
    const LINK_COLUMN: &'static str;
}

macro_rules! taxonomy {
    ($kind:ty, $label:literal, $table:literal, $link_table:literal, $link_column:literal) => {
        impl EntityKind for $kind {
            type Fields = ();
            const LABEL: &'static str = $label;

            fn normalize(key: &str) -> String {
                key.to_string()
            }
        }

        impl Taxonomy for $kind {
            const TABLE: &'static str = $table;
            const LINK_TABLE: &'static str = $link_table;
            const LINK_COLUMN: &'static str = $link_column;
        }

        impl EntitySource<$kind> for MtgStore<'_> {
            fn existing(&self) -> Result<Vec<(String, RowId)>> {
                self.named_rows(<$kind as Taxonomy>::TABLE)
            }

            fn create(&self, name: &str, _fields: &()) -> Result<RowId> {
                self.insert_named(<$kind as Taxonomy>::TABLE, name)
            }
        }
    };
}

taxonomy!(Supertype, "supertype", "mtg_supertypes", "mtg_card_supertypes", "supertype_id");
taxonomy!(CardType, "type", "mtg_types", "mtg_card_types", "type_id");
taxonomy!(Subtype, "subtype", "mtg_subtypes", "mtg_card_subtypes", "subtype_id");

/// Card columns used when a card is first created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCard {
    pub name: String,
    pub mana_cost: String,
    pub text: String,
    pub power: String,
    pub toughness: String,
    pub loyalty: Option<i64>,
}

/// Printing columns
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrinting {
    pub card_id: RowId,
    pub set_id: RowId,
    pub rarity: Rarity,
    pub flavor_text: String,
    pub artist_id: Option<RowId>,
    pub number: String,
    pub multiverse_id: Option<i64>,
}

/// MTGJSON tables behind a connection (usually an open transaction)
pub struct MtgStore<'a> {
    conn: &'a Connection,
}

impl<'a> MtgStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Fetch a card by exact name, creating it from `card` if missing.
    ///
    /// Existing cards are left untouched. The boolean is `true` on creation.
    pub fn get_or_create_card(&self, card: &NewCard) -> Result<(RowId, bool)> {
        let existing: Option<RowId> = self
            .conn
            .prepare_cached("SELECT id FROM mtg_cards WHERE name = ?1")?
            .query_row(params![&card.name], |row| row.get(0))
            .optional()?;
        if let Some(id) = existing {
            return Ok((id, false));
        }

        self.conn
            .prepare_cached(
                "INSERT INTO mtg_cards (name, mana_cost, text, power, toughness, loyalty)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?
            .execute(params![
                &card.name,
                &card.mana_cost,
                &card.text,
                &card.power,
                &card.toughness,
                card.loyalty,
            ])?;
        Ok((self.conn.last_insert_rowid(), true))
    }

    /// Attach a taxonomy tag to a card; attaching twice is a no-op
    pub fn link<T: Taxonomy>(&self, card_id: RowId, tag_id: RowId) -> Result<()> {
        let sql = format!(
            "INSERT OR IGNORE INTO {} (card_id, {}) VALUES (?1, ?2)",
            T::LINK_TABLE,
            T::LINK_COLUMN
        );
        self.conn.prepare_cached(&sql)?.execute(params![card_id, tag_id])?;
        Ok(())
    }

    /// Find an artist by full name, creating one if none exists
    pub fn get_or_create_artist(&self, full_name: &str) -> Result<RowId> {
        let existing: Option<RowId> = self
            .conn
            .prepare_cached("SELECT id FROM mtg_artists WHERE full_name = ?1 ORDER BY id LIMIT 1")?
            .query_row(params![full_name], |row| row.get(0))
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn
            .prepare_cached("INSERT INTO mtg_artists (full_name) VALUES (?1)")?
            .execute(params![full_name])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a printing without checking for an existing copy
    pub fn insert_printing(&self, printing: &NewPrinting) -> Result<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO mtg_printings
                 (card_id, set_id, rarity, flavor_text, artist_id, number, multiverse_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?
            .execute(params![
                printing.card_id,
                printing.set_id,
                printing.rarity.as_str(),
                &printing.flavor_text,
                printing.artist_id,
                &printing.number,
                printing.multiverse_id,
            ])?;
        Ok(())
    }

    /// Insert a printing unless one with identical fields exists.
    ///
    /// Returns `true` when a row was inserted.
    pub fn get_or_create_printing(&self, printing: &NewPrinting) -> Result<bool> {
        let existing: Option<RowId> = self
            .conn
            .prepare_cached(
                "SELECT id FROM mtg_printings
                 WHERE card_id = ?1 AND set_id = ?2 AND rarity = ?3 AND flavor_text = ?4
                   AND artist_id IS ?5 AND number = ?6 AND multiverse_id IS ?7
                 LIMIT 1",
            )?
            .query_row(
                params![
                    printing.card_id,
                    printing.set_id,
                    printing.rarity.as_str(),
                    &printing.flavor_text,
                    printing.artist_id,
                    &printing.number,
                    printing.multiverse_id,
                ],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(false);
        }

        self.insert_printing(printing)?;
        Ok(true)
    }

    /// Delete every printing of `card_name` in `set_code` except the oldest
    pub fn remove_duplicate_printings(&self, set_code: &str, card_name: &str) -> Result<usize> {
        let removed = self
            .conn
            .prepare_cached(
                "DELETE FROM mtg_printings
                 WHERE id IN (
                     SELECT p.id FROM mtg_printings p
                     JOIN mtg_sets s ON s.id = p.set_id
                     JOIN mtg_cards c ON c.id = p.card_id
                     WHERE s.code = ?1 AND c.name = ?2
                     ORDER BY p.id
                     LIMIT -1 OFFSET 1
                 )",
            )?
            .execute(params![set_code, card_name])?;
        Ok(removed)
    }

    /// `table` is always a static taxonomy table name
    fn named_rows(&self, table: &str) -> Result<Vec<(String, RowId)>> {
        let mut stmt = self.conn.prepare(&format!("SELECT name, id FROM {table}"))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn insert_named(&self, table: &str, name: &str) -> Result<RowId> {
        self.conn
            .prepare_cached(&format!("INSERT INTO {table} (name) VALUES (?1)"))?
            .execute(params![name])?;
        Ok(self.conn.last_insert_rowid())
    }
}

impl EntitySource<MtgSetCode> for MtgStore<'_> {
    fn existing(&self) -> Result<Vec<(String, RowId)>> {
        let mut stmt = self.conn.prepare("SELECT code, id FROM mtg_sets")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn create(&self, code: &str, name: &String) -> Result<RowId> {
        self.conn
            .prepare_cached("INSERT INTO mtg_sets (code, name) VALUES (?1, ?2)")?
            .execute(params![code, name])?;
        Ok(self.conn.last_insert_rowid())
    }
}
