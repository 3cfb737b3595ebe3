//! Keyed lookups over fetched entity lists.

use std::collections::HashMap;

/// An append-only list with a lookup map keyed by one field.
///
/// The map is built once when the list is fetched and kept current by
/// [`Indexed::push`]. When several entries share a key the first one wins.
#[derive(Debug, Clone)]
pub struct Indexed<T> {
    items: Vec<T>,
    positions: HashMap<String, usize>,
    key: fn(&T) -> &str,
}

impl<T> Indexed<T> {
    pub fn new(items: Vec<T>, key: fn(&T) -> &str) -> Self {
        let mut positions = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            positions.entry(key(item).to_string()).or_insert(pos);
        }
        Self {
            items,
            positions,
            key,
        }
    }

    /// Looks up an entry by key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.positions.get(key).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Appends an entry, making it visible to later lookups.
    pub fn push(&mut self, item: T) {
        let pos = self.items.len();
        self.positions
            .entry((self.key)(&item).to_string())
            .or_insert(pos);
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
