//! MTGJSON `AllSets` payload types

use serde::Deserialize;
use std::collections::BTreeMap;

/// Set code to set data, as found in the archive
pub type AllSets = BTreeMap<String, SetData>;

/// One set of the dump
#[derive(Debug, Deserialize, Clone)]
pub struct SetData {
    pub name: String,
    #[serde(default)]
    pub cards: Vec<CardData>,
}

/// One card entry of a set (a printing, in our terms)
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub name: String,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    /// Number in most sets, string in some
    #[serde(default)]
    pub loyalty: Option<serde_json::Value>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Missing on certain sets
    #[serde(default, rename = "multiverseid")]
    pub multiverse_id: Option<i64>,
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(default)]
    pub rarity: String,
    /// Absent on old sets
    #[serde(default)]
    pub number: Option<String>,
}

impl CardData {
    pub fn is_token(&self) -> bool {
        self.layout.as_deref() == Some("token")
    }

    /// Starting loyalty, if the card has a numeric one
    pub fn loyalty(&self) -> Option<i64> {
        match self.loyalty.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
