//! Printing rarity vocabulary

/// Rarity of a printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Mythic,
    Rare,
    Uncommon,
    Common,
    BasicLand,
    /// Timeshifted, promo and anything else outside the vocabulary
    Special,
}

/// MTGJSON rarity strings we recognise
pub const RARITY_VOCABULARY: &[(&str, Rarity)] = &[
    ("Mythic Rare", Rarity::Mythic),
    ("Rare", Rarity::Rare),
    ("Uncommon", Rarity::Uncommon),
    ("Common", Rarity::Common),
    ("Basic Land", Rarity::BasicLand),
];

impl Rarity {
    /// Parse an MTGJSON rarity; unknown strings map to `Special`
    pub fn parse(value: &str) -> Self {
        RARITY_VOCABULARY
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, rarity)| *rarity)
            .unwrap_or(Rarity::Special)
    }

    /// Value stored in the `rarity` column
    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Mythic => "mythic",
            Rarity::Rare => "rare",
            Rarity::Uncommon => "uncommon",
            Rarity::Common => "common",
            Rarity::BasicLand => "basic_land",
            Rarity::Special => "special",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
