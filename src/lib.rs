//! Card Sync - trading card metadata importer
//!
//! Fetches card, set and printing data from FABDB (Flesh and Blood) and
//! MTGJSON (Magic: The Gathering) and reconciles it into a local SQLite
//! database with create-or-update semantics, so repeated imports converge.

pub mod cache;
pub mod database;
pub mod error;
pub mod fabdb;
pub mod filter;
pub mod mtgjson;
pub mod summary;

pub use database::{entity_counts, init_schema, EntityCounts, Game};
pub use error::{Result, SyncError};
pub use filter::SetFilter;
