//! SQLite access for the `fab_*` tables

use crate::cache::{EntityKind, EntitySource, RowId};
use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// FABDB sets, keyed case-insensitively by code
///
/// FABDB has emitted the same set code in different casings across pages,
/// so codes are lower-cased for matching. The stored code keeps its first-seen
/// casing.
pub struct FabSetCode;

impl EntityKind for FabSetCode {
    /// Display name of the set
    type Fields = String;
    const LABEL: &'static str = "FAB set";

    fn normalize(key: &str) -> String {
        key.to_lowercase()
    }
}

/// Pitch colours, indexed by resource value minus one
const PITCH_COLOURS: [&str; 3] = ["red", "yellow", "blue"];

/// Name of a card as shown to users
///
/// Pitch variants share a name, so a card whose identifier ends in a pitch
/// colour and whose resource is 1, 2 or 3 reads as `"Snatch (red)"`.
pub fn display_name(identifier: &str, name: &str, resource: Option<&str>) -> String {
    let suffix = identifier.rsplit('-').next().unwrap_or_default();
    if !PITCH_COLOURS.contains(&suffix) {
        return name.to_string();
    }
    match resource.and_then(|r| r.trim().parse::<usize>().ok()) {
        Some(pitch @ 1..=3) => format!("{} ({})", name, PITCH_COLOURS[pitch - 1]),
        _ => name.to_string(),
    }
}

/// Card columns written by an upsert
///
/// `None` in an optional column keeps whatever is already stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardRecord {
    pub identifier: String,
    pub name: String,
    pub text: String,
    pub keywords: Option<String>,
    pub rarity: Option<String>,
    pub stats: CardStats,
}

/// Known stat columns of a card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardStats {
    pub attack: Option<String>,
    pub defense: Option<String>,
    pub resource: Option<String>,
    pub cost: Option<String>,
    pub intellect: Option<String>,
    pub life: Option<String>,
}

/// Printing columns written by an upsert
#[derive(Debug, Clone, PartialEq)]
pub struct PrintingRecord {
    pub sku: String,
    pub card_id: RowId,
    pub set_id: RowId,
    pub rarity: Option<String>,
    pub finish: Option<String>,
    pub printing_id: Option<i64>,
    pub image_url: Option<String>,
    pub language: String,
}

/// FABDB tables behind a connection (usually an open transaction)
pub struct FabStore<'a> {
    conn: &'a Connection,
}

impl<'a> FabStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Identifiers of every stored card
    pub fn card_identifiers(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT identifier FROM fab_cards")?;
        let identifiers = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(identifiers)
    }

    /// Delete a card (and through the cascade, its printings)
    ///
    /// Returns whether a row was removed.
    pub fn delete_card(&self, identifier: &str) -> Result<bool> {
        let removed = self
            .conn
            .prepare_cached("DELETE FROM fab_cards WHERE identifier = ?1")?
            .execute(params![identifier])?;
        Ok(removed > 0)
    }

    /// Display name of a stored card, `None` if the identifier is unknown
    pub fn display_name(&self, identifier: &str) -> Result<Option<String>> {
        let row = self
            .conn
            .prepare_cached("SELECT name, resource FROM fab_cards WHERE identifier = ?1")?
            .query_row(params![identifier], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })
            .optional()?;
        Ok(row.map(|(name, resource)| display_name(identifier, &name, resource.as_deref())))
    }

    /// Create or update a card keyed by identifier, returning its row id
    pub fn upsert_card(&self, card: &CardRecord) -> Result<RowId> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO fab_cards
             (identifier, name, text, keywords, rarity,
              attack, defense, resource, cost, intellect, life)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(identifier) DO UPDATE SET
                name      = excluded.name,
                text      = excluded.text,
                keywords  = COALESCE(excluded.keywords, keywords),
                rarity    = COALESCE(excluded.rarity, rarity),
                attack    = COALESCE(excluded.attack, attack),
                defense   = COALESCE(excluded.defense, defense),
                resource  = COALESCE(excluded.resource, resource),
                cost      = COALESCE(excluded.cost, cost),
                intellect = COALESCE(excluded.intellect, intellect),
                life      = COALESCE(excluded.life, life)
             RETURNING id",
        )?;

        let stats = &card.stats;
        let id = stmt.query_row(
            params![
                &card.identifier,
                &card.name,
                &card.text,
                &card.keywords,
                &card.rarity,
                &stats.attack,
                &stats.defense,
                &stats.resource,
                &stats.cost,
                &stats.intellect,
                &stats.life,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Create or update a printing keyed by SKU
    pub fn upsert_printing(&self, printing: &PrintingRecord) -> Result<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO fab_printings
                 (sku, card_id, set_id, rarity, finish, printing_id, image_url, language)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(sku) DO UPDATE SET
                    card_id     = excluded.card_id,
                    set_id      = excluded.set_id,
                    rarity      = excluded.rarity,
                    finish      = excluded.finish,
                    printing_id = excluded.printing_id,
                    image_url   = excluded.image_url,
                    language    = excluded.language",
            )?
            .execute(params![
                &printing.sku,
                printing.card_id,
                printing.set_id,
                &printing.rarity,
                &printing.finish,
                printing.printing_id,
                &printing.image_url,
                &printing.language,
            ])?;
        Ok(())
    }
}

impl EntitySource<FabSetCode> for FabStore<'_> {
    fn existing(&self) -> Result<Vec<(String, RowId)>> {
        let mut stmt = self.conn.prepare("SELECT code, id FROM fab_sets")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn create(&self, code: &str, name: &String) -> Result<RowId> {
        self.conn
            .prepare_cached("INSERT INTO fab_sets (code, name) VALUES (?1, ?2)")?
            .execute(params![code, name])?;
        Ok(self.conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EntityCache;
    use crate::database::init_schema;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn card(identifier: &str, name: &str) -> CardRecord {
        CardRecord {
            identifier: identifier.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn upsert_card_returns_same_id_on_update() {
        let conn = test_db();
        let store = FabStore::new(&conn);

        let first = store.upsert_card(&card("snatch-red", "Snatch")).unwrap();
        let second = store.upsert_card(&card("snatch-red", "Snatch!")).unwrap();

        assert_eq!(first, second);
        let name: String = conn
            .query_row("SELECT name FROM fab_cards WHERE id = ?1", params![first], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(name, "Snatch!");
    }

    #[test]
    fn upsert_card_keeps_stored_optionals_when_absent() {
        let conn = test_db();
        let store = FabStore::new(&conn);

        let mut full = card("snatch-red", "Snatch");
        full.rarity = Some("C".to_string());
        full.stats.attack = Some("4".to_string());
        store.upsert_card(&full).unwrap();

        store.upsert_card(&card("snatch-red", "Snatch")).unwrap();

        let (rarity, attack): (Option<String>, Option<String>) = conn
            .query_row(
                "SELECT rarity, attack FROM fab_cards WHERE identifier = 'snatch-red'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(rarity.as_deref(), Some("C"));
        assert_eq!(attack.as_deref(), Some("4"));
    }

    #[test]
    fn delete_card_reports_whether_row_existed() {
        let conn = test_db();
        let store = FabStore::new(&conn);
        store.upsert_card(&card("snatch-red", "Snatch")).unwrap();

        assert!(store.delete_card("snatch-red").unwrap());
        assert!(!store.delete_card("snatch-red").unwrap());
        assert!(store.card_identifiers().unwrap().is_empty());
    }

    #[test]
    fn display_name_marks_pitch_colour() {
        assert_eq!(display_name("snatch-red", "Snatch", Some("1")), "Snatch (red)");
        assert_eq!(display_name("snatch-yellow", "Snatch", Some("2")), "Snatch (yellow)");
        assert_eq!(display_name("snatch-blue", "Snatch", Some("3")), "Snatch (blue)");
    }

    #[test]
    fn display_name_plain_without_suffix_or_pitch() {
        assert_eq!(display_name("dorinthea-ironsong", "Dorinthea", Some("1")), "Dorinthea");
        assert_eq!(display_name("snatch-red", "Snatch", None), "Snatch");
        assert_eq!(display_name("snatch-red", "Snatch", Some("0")), "Snatch");
        assert_eq!(display_name("snatch-red", "Snatch", Some("X")), "Snatch");
        assert_eq!(display_name("redwood", "Redwood", Some("1")), "Redwood");
    }

    #[test]
    fn stored_pitch_variants_have_distinct_display_names() {
        let conn = test_db();
        let store = FabStore::new(&conn);
        for (identifier, resource) in [("snatch-red", "1"), ("snatch-blue", "3")] {
            let mut record = card(identifier, "Snatch");
            record.stats.resource = Some(resource.to_string());
            store.upsert_card(&record).unwrap();
        }

        assert_eq!(
            store.display_name("snatch-red").unwrap().as_deref(),
            Some("Snatch (red)")
        );
        assert_eq!(
            store.display_name("snatch-blue").unwrap().as_deref(),
            Some("Snatch (blue)")
        );
        assert_eq!(store.display_name("missing").unwrap(), None);
    }

    #[test]
    fn set_cache_is_case_insensitive_over_store() {
        let conn = test_db();
        let store = FabStore::new(&conn);
        let mut cache = EntityCache::<FabSetCode>::new();

        let (id, created) = cache
            .get_or_create(&store, "WTR", &"Welcome to Rathe".to_string())
            .unwrap();
        assert!(created);

        let mut reloaded = EntityCache::<FabSetCode>::preload(&store, |_| true).unwrap();
        let (again, created) = reloaded
            .get_or_create(&store, "wtr", &"Welcome to Rathe".to_string())
            .unwrap();
        assert!(!created);
        assert_eq!(id, again);
    }
}
