//! Set selection for imports

use std::collections::BTreeSet;

/// Which sets an import should process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SetFilter {
    /// Process every set in the payload
    #[default]
    All,
    /// Process only the listed set codes (exact match)
    Only(BTreeSet<String>),
}

impl SetFilter {
    /// Build a filter from CLI-style codes; an empty list means all sets
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: BTreeSet<String> = codes.into_iter().map(Into::into).collect();
        if codes.is_empty() {
            SetFilter::All
        } else {
            SetFilter::Only(codes)
        }
    }

    /// Whether the set with this code should be processed
    pub fn includes(&self, code: &str) -> bool {
        match self {
            SetFilter::All => true,
            SetFilter::Only(codes) => codes.contains(code),
        }
    }
}
