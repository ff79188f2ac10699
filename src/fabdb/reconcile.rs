//! Reconciliation of a full FABDB fetch into the `fab_*` tables
//!
//! FABDB occasionally lists the same card twice: once under a generic
//! identifier and once per pitch colour (`-red`, `-yellow`, `-blue`). When
//! both forms exist for a name, the coloured ones win and the generic
//! identifiers are treated as blacklisted for the run.

use super::models::{FabCard, FabPrinting};
use super::store::{CardRecord, CardStats, FabSetCode, FabStore, PrintingRecord};
use crate::cache::EntityCache;
use crate::error::Result;
use rusqlite::Connection;
use std::collections::{BTreeMap, HashSet};

/// Identifiers that are never imported
const BLACKLISTED_IDENTIFIERS: &[&str] = &[
    "crazy-brew-blue",                 // Duplicate of 'crazy-brew'
    "cracked-bauble-yellow",           // Duplicate of 'cracked-bauble'
    "flock-of-the-featherwalkers",     // Not a real card
    "flock-of-the-featherwalkers-red", // Not a real card
];

/// Identifier suffixes marking a pitch-colour variant
const PITCH_SUFFIXES: &[&str] = &["-red", "-yellow", "-blue"];

/// Language assumed for printings that don't state one
const DEFAULT_LANGUAGE: &str = "en";

/// Static data driving FABDB reconciliation
#[derive(Debug, Clone)]
pub struct FabRules {
    /// Identifiers skipped (and removed from the store) on every run
    pub blacklist: HashSet<String>,
    /// Suffixes identifying pitch-colour variants
    pub pitch_suffixes: Vec<String>,
}

impl Default for FabRules {
    fn default() -> Self {
        Self {
            blacklist: BLACKLISTED_IDENTIFIERS.iter().map(|s| s.to_string()).collect(),
            pitch_suffixes: PITCH_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FabRules {
    fn is_pitch_variant(&self, identifier: &str) -> bool {
        self.pitch_suffixes
            .iter()
            .any(|suffix| identifier.ends_with(suffix.as_str()))
    }
}

/// Outcome of duplicate-identifier resolution over one fetch
#[derive(Debug, Default)]
pub struct DuplicateResolution {
    /// Static blacklist plus generic identifiers shadowed by pitch variants
    pub blacklist: HashSet<String>,
    /// Every fetched identifier not on the static blacklist
    pub fetched: HashSet<String>,
}

impl DuplicateResolution {
    pub fn is_blacklisted(&self, identifier: &str) -> bool {
        self.blacklist.contains(identifier)
    }
}

/// Counts from one FABDB import
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FabImportStats {
    /// Cards created or updated
    pub cards_upserted: usize,
    /// Cards deleted as stale or blacklisted
    pub cards_removed: usize,
    /// Printings created or updated
    pub printings_upserted: usize,
    /// Sets created during the run
    pub sets_created: usize,
}

/// Applies a FABDB fetch to the database
pub struct FabReconciler {
    rules: FabRules,
}

impl FabReconciler {
    pub fn new(rules: FabRules) -> Self {
        Self { rules }
    }

    /// Work out which identifiers to drop before touching the database
    pub fn resolve_duplicates(&self, cards: &[FabCard]) -> DuplicateResolution {
        let mut blacklist = self.rules.blacklist.clone();
        let mut fetched = HashSet::new();
        let mut by_name: BTreeMap<String, Vec<&str>> = BTreeMap::new();

        for card in cards {
            if blacklist.contains(&card.identifier) {
                continue;
            }
            by_name
                .entry(card.name.trim().to_lowercase())
                .or_default()
                .push(&card.identifier);
            fetched.insert(card.identifier.clone());
        }

        for (name, identifiers) in &by_name {
            if identifiers.len() < 2 {
                continue;
            }
            let (pitch, non_pitch): (Vec<&str>, Vec<&str>) = identifiers
                .iter()
                .copied()
                .partition(|id| self.rules.is_pitch_variant(id));
            if !pitch.is_empty() && !non_pitch.is_empty() {
                log::warn!(
                    "'{}' has both generic {:?} and pitch {:?} identifiers, dropping generic",
                    name,
                    non_pitch,
                    pitch
                );
                blacklist.extend(non_pitch.into_iter().map(String::from));
            }
        }

        DuplicateResolution { blacklist, fetched }
    }

    /// Import a complete fetch in one transaction
    ///
    /// Any error rolls back every write of the run.
    pub fn import(&self, conn: &mut Connection, cards: &[FabCard]) -> Result<FabImportStats> {
        let tx = conn.transaction()?;
        let stats = self.import_tx(&tx, cards)?;
        tx.commit()?;

        log::info!(
            "FABDB import: {} cards upserted, {} removed, {} printings upserted, {} new sets",
            stats.cards_upserted,
            stats.cards_removed,
            stats.printings_upserted,
            stats.sets_created
        );
        Ok(stats)
    }

    fn import_tx(&self, conn: &Connection, cards: &[FabCard]) -> Result<FabImportStats> {
        let store = FabStore::new(conn);
        let mut sets = EntityCache::<FabSetCode>::preload(&store, |_| true)?;
        let resolution = self.resolve_duplicates(cards);
        let mut stats = FabImportStats::default();

        // Phase 1: drop cards that FABDB no longer lists
        for identifier in store.card_identifiers()? {
            if !resolution.fetched.contains(&identifier) && store.delete_card(&identifier)? {
                log::debug!("Removed stale card {}", identifier);
                stats.cards_removed += 1;
            }
        }

        // Phase 2: upsert cards and their printings
        for card in cards {
            if resolution.is_blacklisted(&card.identifier) {
                if store.delete_card(&card.identifier)? {
                    log::debug!("Removed blacklisted card {}", card.identifier);
                    stats.cards_removed += 1;
                }
                continue;
            }

            let card_id = store.upsert_card(&card_record(card))?;
            stats.cards_upserted += 1;

            for printing in &card.printings {
                let set = &printing.sku.set;
                let (set_id, _) = sets.get_or_create(&store, &set.id, &set.name)?;
                store.upsert_printing(&printing_record(printing, card_id, set_id))?;
                stats.printings_upserted += 1;
            }
        }

        stats.sets_created = sets.created();
        Ok(stats)
    }
}

/// Map a fetched card onto the columns it overwrites
fn card_record(card: &FabCard) -> CardRecord {
    CardRecord {
        identifier: card.identifier.clone(),
        name: card.name.trim().to_string(),
        text: card.text.clone().unwrap_or_default(),
        keywords: card.keywords.as_ref().map(|k| k.join(" ")),
        rarity: card.rarity.clone(),
        stats: card
            .stats
            .as_ref()
            .map(|stats| card_stats(&card.identifier, stats))
            .unwrap_or_default(),
    }
}

fn card_stats(
    identifier: &str,
    raw: &std::collections::HashMap<String, serde_json::Value>,
) -> CardStats {
    let mut stats = CardStats::default();
    for (key, value) in raw {
        let slot = match key.as_str() {
            "attack" => &mut stats.attack,
            "defense" => &mut stats.defense,
            "resource" => &mut stats.resource,
            "cost" => &mut stats.cost,
            "intellect" => &mut stats.intellect,
            "life" => &mut stats.life,
            other => {
                log::debug!("Ignoring unknown stat '{}' on {}", other, identifier);
                continue;
            }
        };
        *slot = stat_text(value);
    }
    stats
}

/// Stats arrive as strings or numbers; store both as text
fn stat_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn printing_record(printing: &FabPrinting, card_id: i64, set_id: i64) -> PrintingRecord {
    PrintingRecord {
        sku: printing.sku.sku.clone(),
        card_id,
        set_id,
        rarity: printing.rarity.clone(),
        finish: printing.sku.finish.clone(),
        printing_id: printing.id,
        image_url: printing.image.clone(),
        language: printing
            .language
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
    }
}
