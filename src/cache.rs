//! In-memory lookup of persisted entities by natural key
//!
//! Each cache is typed by an [`EntityKind`] that decides how natural keys are
//! normalised. Rows are loaded once at the start of an import so existence
//! checks during reconciliation never hit the database.

use crate::error::Result;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Surrogate id of a persisted row
pub type RowId = i64;

/// A cacheable entity type
pub trait EntityKind {
    /// Extra fields required to create a new row besides its natural key
    type Fields;

    /// Short label used in log output
    const LABEL: &'static str;

    /// Normalise a natural key before it is used for lookup
    fn normalize(key: &str) -> String;
}

/// Persisted store operations the cache needs for one entity type
pub trait EntitySource<K: EntityKind> {
    /// All existing rows as `(natural key, id)` pairs
    fn existing(&self) -> Result<Vec<(String, RowId)>>;

    /// Insert a new row and return its id
    fn create(&self, key: &str, fields: &K::Fields) -> Result<RowId>;
}

/// Natural-key lookup table for one entity type
pub struct EntityCache<K: EntityKind> {
    rows: HashMap<String, RowId>,
    created: usize,
    _kind: PhantomData<K>,
}

impl<K: EntityKind> EntityCache<K> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            created: 0,
            _kind: PhantomData,
        }
    }

    /// Seed the cache from every persisted row whose key passes `keep`
    pub fn preload<S, F>(source: &S, keep: F) -> Result<Self>
    where
        S: EntitySource<K>,
        F: Fn(&str) -> bool,
    {
        let mut cache = Self::new();
        for (key, id) in source.existing()? {
            if keep(&key) {
                cache.rows.insert(K::normalize(&key), id);
            }
        }
        log::debug!("Preloaded {} {} rows", cache.rows.len(), K::LABEL);
        Ok(cache)
    }

    /// Look up a row id by natural key
    pub fn get(&self, key: &str) -> Option<RowId> {
        self.rows.get(&K::normalize(key)).copied()
    }

    /// Return the cached row for `key`, creating it with `fields` if absent.
    ///
    /// The boolean is `true` when a new row was inserted.
    pub fn get_or_create<S>(
        &mut self,
        source: &S,
        key: &str,
        fields: &K::Fields,
    ) -> Result<(RowId, bool)>
    where
        S: EntitySource<K>,
    {
        if let Some(id) = self.get(key) {
            return Ok((id, false));
        }

        let id = source.create(key, fields)?;
        log::debug!("Created {} '{}' (id {})", K::LABEL, key, id);
        self.rows.insert(K::normalize(key), id);
        self.created += 1;
        Ok((id, true))
    }

    /// Number of rows created through this cache
    pub fn created(&self) -> usize {
        self.created
    }
}

impl<K: EntityKind> Default for EntityCache<K> {
    fn default() -> Self {
        Self::new()
    }
}
