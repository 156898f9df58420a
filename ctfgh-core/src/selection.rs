use std::collections::HashSet;

use crate::model::{ItemKey, Listed};

/// Set of selected item keys that survives re-rendering and refreshes.
///
/// Every mutation is idempotent. Callers re-render after mutating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    keys: HashSet<ItemKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ItemKey) {
        self.keys.insert(key);
    }

    pub fn remove(&mut self, key: &ItemKey) {
        self.keys.remove(key);
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.keys.contains(key)
    }

    /// Checkbox semantics: `checked` decides membership
    pub fn toggle(&mut self, key: ItemKey, checked: bool) {
        if checked {
            self.insert(key);
        } else {
            self.remove(&key);
        }
    }

    /// Invert membership of a single key
    pub fn flip(&mut self, key: ItemKey) {
        let checked = !self.contains(&key);
        self.toggle(key, checked);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn select_all<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = ItemKey>,
    {
        self.keys.extend(keys);
    }

    /// Drop every selected key that is not in `valid`, keep the rest
    pub fn reconcile<I>(&mut self, valid: I)
    where
        I: IntoIterator<Item = ItemKey>,
    {
        let valid: HashSet<ItemKey> = valid.into_iter().collect();
        self.keys.retain(|key| valid.contains(key));
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemKey> {
        self.keys.iter()
    }

    /// Selected items in collection order
    pub fn ordered_in<'a, T: Listed>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.contains(&item.key()))
            .collect()
    }
}
