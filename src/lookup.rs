use std::collections::{BTreeMap, HashMap};

use crate::model::{Color, Species};

/// Something addressable both by numeric id and by name.
pub trait Named {
    /// Numeric id.
    fn id(&self) -> u32;
    /// Display name.
    fn name(&self) -> &str;
}

impl Named for Species {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Color {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Two-way index over species or colors.
///
/// Holds an id-keyed map and a lowercase-name map built together, so both stay consistent.
#[derive(Clone, Debug)]
pub struct NameIndex<T> {
    by_id: BTreeMap<u32, T>,
    by_name: HashMap<String, u32>,
}

impl<T> Default for NameIndex<T> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<T: Named> NameIndex<T> {
    /// Build from values; later duplicates of an id or name replace earlier ones.
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        let mut index = Self::default();
        for value in values {
            index
                .by_name
                .insert(value.name().to_lowercase(), value.id());
            index.by_id.insert(value.id(), value);
        }
        index
    }

    /// Resolve `key` as a numeric id first, then as a case-insensitive name.
    pub fn resolve(&self, key: &str) -> Option<&T> {
        let key = key.trim();
        if let Ok(id) = key.parse::<u32>()
            && let Some(v) = self.by_id.get(&id)
        {
            return Some(v);
        }
        self.by_name
            .get(&key.to_lowercase())
            .and_then(|id| self.by_id.get(id))
    }

    /// Look up by id.
    pub fn get(&self, id: u32) -> Option<&T> {
        self.by_id.get(&id)
    }

    /// Values in id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.by_id.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/unit/lookup.rs"]
mod tests;
