//! Reconciliation of the MTGJSON dump into the `mtg_*` tables

use super::models::{AllSets, CardData, SetData};
use super::rarity::Rarity;
use super::store::{
    CardType, MtgSetCode, MtgStore, NewCard, NewPrinting, Subtype, Supertype, Taxonomy,
};
use crate::cache::{EntityCache, EntitySource, RowId};
use crate::error::Result;
use crate::filter::SetFilter;
use rusqlite::Connection;

/// A set whose upstream data lists some cards twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownDuplicate {
    pub set_code: &'static str,
    pub card_names: &'static [&'static str],
}

/// Upstream duplicates: <https://github.com/mtgjson/mtgjson/issues/388>
const KNOWN_DUPLICATES: &[KnownDuplicate] = &[KnownDuplicate {
    set_code: "BOK",
    card_names: &["Jaraku the Interloper", "Scarmaker"],
}];

/// Static data driving MTGJSON reconciliation
#[derive(Debug, Clone)]
pub struct MtgRules {
    /// Printings to collapse to a single row after import
    pub known_duplicates: Vec<KnownDuplicate>,
}

impl Default for MtgRules {
    fn default() -> Self {
        Self {
            known_duplicates: KNOWN_DUPLICATES.to_vec(),
        }
    }
}

/// Counts from one MTGJSON import
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MtgImportStats {
    pub sets_processed: usize,
    pub sets_created: usize,
    pub cards_created: usize,
    pub printings_created: usize,
    pub tokens_skipped: usize,
    pub duplicates_removed: usize,
}

/// Taxonomy caches, all preloaded in full
struct TagCaches {
    supertypes: EntityCache<Supertype>,
    types: EntityCache<CardType>,
    subtypes: EntityCache<Subtype>,
}

/// Applies an MTGJSON dump to the database
pub struct MtgReconciler {
    rules: MtgRules,
}

impl MtgReconciler {
    pub fn new(rules: MtgRules) -> Self {
        Self { rules }
    }

    /// Import the selected sets in one transaction
    ///
    /// Any error rolls back every write of the run.
    pub fn import(
        &self,
        conn: &mut Connection,
        sets: &AllSets,
        filter: &SetFilter,
    ) -> Result<MtgImportStats> {
        let tx = conn.transaction()?;
        let stats = self.import_tx(&tx, sets, filter)?;
        tx.commit()?;

        log::info!(
            "MTGJSON import: {} sets processed ({} new), {} new cards, {} new printings, \
             {} tokens skipped, {} duplicate printings removed",
            stats.sets_processed,
            stats.sets_created,
            stats.cards_created,
            stats.printings_created,
            stats.tokens_skipped,
            stats.duplicates_removed
        );
        Ok(stats)
    }

    fn import_tx(
        &self,
        conn: &Connection,
        sets: &AllSets,
        filter: &SetFilter,
    ) -> Result<MtgImportStats> {
        let store = MtgStore::new(conn);
        let mut set_cache = EntityCache::<MtgSetCode>::preload(&store, |code| filter.includes(code))?;
        let mut tags = TagCaches {
            supertypes: EntityCache::preload(&store, |_| true)?,
            types: EntityCache::preload(&store, |_| true)?,
            subtypes: EntityCache::preload(&store, |_| true)?,
        };
        let mut stats = MtgImportStats::default();

        for (code, set) in sets {
            if !filter.includes(code) {
                continue;
            }
            self.import_set(&store, &mut set_cache, &mut tags, code, set, &mut stats)?;
            stats.sets_processed += 1;
        }
        stats.sets_created = set_cache.created();

        for duplicate in &self.rules.known_duplicates {
            if !filter.includes(duplicate.set_code) {
                continue;
            }
            for name in duplicate.card_names {
                let removed = store.remove_duplicate_printings(duplicate.set_code, name)?;
                if removed > 0 {
                    log::warn!(
                        "Removed {} duplicated printing(s) of '{}' in {}",
                        removed,
                        name,
                        duplicate.set_code
                    );
                }
                stats.duplicates_removed += removed;
            }
        }

        Ok(stats)
    }

    fn import_set(
        &self,
        store: &MtgStore<'_>,
        set_cache: &mut EntityCache<MtgSetCode>,
        tags: &mut TagCaches,
        code: &str,
        set: &SetData,
        stats: &mut MtgImportStats,
    ) -> Result<()> {
        let (set_id, set_created) = set_cache.get_or_create(store, code, &set.name)?;
        log::info!(
            "Importing {} ({}, {} cards{})",
            code,
            set.name,
            set.cards.len(),
            if set_created { ", new set" } else { "" }
        );

        // A brand-new set can't have printings yet, so skip the existence checks
        let mut new_printings = Vec::new();

        for card_data in &set.cards {
            if card_data.is_token() {
                stats.tokens_skipped += 1;
                continue;
            }

            let (card_id, card_created) = store.get_or_create_card(&new_card(card_data))?;
            if card_created {
                stats.cards_created += 1;
            }
            attach_tags(store, &mut tags.supertypes, card_id, &card_data.supertypes)?;
            attach_tags(store, &mut tags.types, card_id, &card_data.types)?;
            attach_tags(store, &mut tags.subtypes, card_id, &card_data.subtypes)?;

            let artist_id = match card_data.artist.as_deref() {
                Some(name) => Some(store.get_or_create_artist(name)?),
                None => None,
            };
            let printing = NewPrinting {
                card_id,
                set_id,
                rarity: Rarity::parse(&card_data.rarity),
                flavor_text: card_data.flavor.clone().unwrap_or_default(),
                artist_id,
                number: card_data.number.clone().unwrap_or_default(),
                multiverse_id: card_data.multiverse_id,
            };

            if set_created {
                new_printings.push(printing);
            } else if store.get_or_create_printing(&printing)? {
                stats.printings_created += 1;
            }
        }

        for printing in &new_printings {
            store.insert_printing(printing)?;
        }
        stats.printings_created += new_printings.len();
        Ok(())
    }
}

fn new_card(data: &CardData) -> NewCard {
    NewCard {
        name: data.name.clone(),
        mana_cost: data.mana_cost.clone().unwrap_or_default(),
        text: data.text.clone().unwrap_or_default(),
        power: data.power.clone().unwrap_or_default(),
        toughness: data.toughness.clone().unwrap_or_default(),
        loyalty: data.loyalty(),
    }
}

fn attach_tags<T>(
    store: &MtgStore<'_>,
    cache: &mut EntityCache<T>,
    card_id: RowId,
    names: &[String],
) -> Result<()>
where
    T: Taxonomy,
    for<'a> MtgStore<'a>: EntitySource<T>,
{
    for name in names {
        let (tag_id, _) = cache.get_or_create(store, name, &())?;
        store.link::<T>(card_id, tag_id)?;
    }
    Ok(())
}
