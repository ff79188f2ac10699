//! FABDB API payload types

use serde::Deserialize;
use std::collections::HashMap;

/// One page of the `/api/cards` listing
#[derive(Debug, Deserialize)]
pub struct CardPage {
    pub data: Vec<FabCard>,
    pub meta: PageMeta,
}

/// Pagination metadata
#[derive(Debug, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
}

/// A card as returned by FABDB
#[derive(Debug, Deserialize, Clone)]
pub struct FabCard {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub rarity: Option<String>,
    /// Stat name to value; values arrive as strings or numbers
    #[serde(default)]
    pub stats: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub printings: Vec<FabPrinting>,
}

/// A published printing of a card
#[derive(Debug, Deserialize, Clone)]
pub struct FabPrinting {
    /// FABDB's own printing id
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub sku: FabSku,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FabSku {
    pub sku: String,
    #[serde(default)]
    pub finish: Option<String>,
    pub set: FabSetRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FabSetRef {
    /// Set code, e.g. `WTR`
    pub id: String,
    pub name: String,
}
