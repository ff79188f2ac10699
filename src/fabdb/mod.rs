//! FABDB importer for Flesh and Blood cards
//!
//! Fetches every card page from the FABDB REST API and reconciles the result
//! into the `fab_*` tables in a single transaction.

mod client;
mod models;
mod reconcile;
mod store;

pub use client::{FabDbClient, API_URL, PAGE_SIZE};
pub use models::{CardPage, FabCard, FabPrinting, FabSetRef, FabSku, PageMeta};
pub use reconcile::{DuplicateResolution, FabImportStats, FabReconciler, FabRules};
pub use store::{display_name, FabSetCode, FabStore};

use crate::error::Result;
use rusqlite::Connection;

/// Fetch all cards from FABDB and import them
pub async fn import_cards(
    conn: &mut Connection,
    client: &FabDbClient,
    rules: FabRules,
) -> Result<FabImportStats> {
    let cards = client.fetch_all().await?;
    FabReconciler::new(rules).import(conn, &cards)
}
