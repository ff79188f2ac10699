//! MTGJSON importer for Magic: The Gathering cards
//!
//! Downloads the zipped `AllSets` dump and reconciles the selected sets into
//! the `mtg_*` tables in a single transaction.

mod client;
mod models;
mod rarity;
mod reconcile;
mod store;

pub use client::{unpack_archive, MtgJsonClient, FALLBACK_MTG_JSON_URL, MTG_JSON_URL};
pub use models::{AllSets, CardData, SetData};
pub use rarity::{Rarity, RARITY_VOCABULARY};
pub use reconcile::{KnownDuplicate, MtgImportStats, MtgReconciler, MtgRules};
pub use store::{CardType, MtgSetCode, MtgStore, NewCard, NewPrinting, Subtype, Supertype, Taxonomy};

use crate::error::Result;
use crate::filter::SetFilter;
use rusqlite::Connection;

/// Download the MTGJSON dump and import the sets selected by `filter`
///
/// The archive is fully downloaded and parsed before any write happens.
pub async fn import_cards(
    conn: &mut Connection,
    client: &MtgJsonClient,
    filter: &SetFilter,
    rules: MtgRules,
) -> Result<MtgImportStats> {
    let sets = client.fetch_all().await?;
    MtgReconciler::new(rules).import(conn, &sets, filter)
}
