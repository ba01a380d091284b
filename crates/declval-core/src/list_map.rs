// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Correlation of list elements across updates by composite key.
//!
//! A list declared as a map (`+k8s:listType=map`) identifies elements by
//! the values of one or more key fields rather than by position. On update,
//! generated code pairs every new element with the old element carrying the
//! same key so update-aware rules compare the right values.
//!
//! ```rust
//! use declval_core::ListMap;
//!
//! #[derive(Debug, PartialEq)]
//! struct Item {
//!     k: String,
//!     v: i32
//! }
//!
//! let old = vec![
//!     Item { k: "a".into(), v: 1 },
//!     Item { k: "b".into(), v: 2 },
//! ];
//! let map = ListMap::new(&old, |item: &Item| (item.k.clone(),));
//!
//! let new = Item { k: "b".into(), v: 9 };
//! assert_eq!(map.with_matching_key(&new), Some(&old[1]));
//! ```

use std::{collections::HashMap, hash::Hash};

/// Index of old list elements by composite key.
pub struct ListMap<'a, T, K, F>
where
    F: Fn(&T) -> K
{
    by_key: HashMap<K, &'a T>,
    key:    F
}

impl<'a, T, K, F> ListMap<'a, T, K, F>
where
    K: Eq + Hash,
    F: Fn(&T) -> K
{
    /// Index `old` by `key`.
    ///
    /// When several old elements share a key, the first one wins.
    pub fn new(old: &'a [T], key: F) -> Self {
        let mut by_key = HashMap::with_capacity(old.len());
        for item in old {
            by_key.entry(key(item)).or_insert(item);
        }
        Self {
            by_key,
            key
        }
    }

    /// Old element whose key equals the key of `new`.
    pub fn with_matching_key(&self, new: &T) -> Option<&'a T> {
        self.by_key.get(&(self.key)(new)).copied()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Check if no old elements were indexed.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        k:  &'static str,
        k2: u32,
        v:  i32
    }

    fn item(k: &'static str, v: i32) -> Item {
        Item {
            k,
            k2: 0,
            v
        }
    }

    #[test]
    fn correlates_by_key_not_position() {
        let old = vec![item("a", 1), item("b", 2)];
        let map = ListMap::new(&old, |i: &Item| (i.k,));
        assert_eq!(map.with_matching_key(&item("b", 9)), Some(&old[1]));
        assert_eq!(map.with_matching_key(&item("a", 9)).map(|i| i.v), Some(1));
    }

    #[test]
    fn unknown_key_is_absent() {
        let old = vec![item("a", 1), item("b", 2)];
        let map = ListMap::new(&old, |i: &Item| (i.k,));
        assert_eq!(map.with_matching_key(&item("c", 9)), None);
    }

    #[test]
    fn composite_key() {
        let old = vec![
            Item {
                k:  "a",
                k2: 1,
                v:  1
            },
            Item {
                k:  "a",
                k2: 2,
                v:  2
            },
        ];
        let map = ListMap::new(&old, |i: &Item| (i.k, i.k2));
        assert_eq!(map.len(), 2);
        let new = Item {
            k:  "a",
            k2: 2,
            v:  7
        };
        assert_eq!(map.with_matching_key(&new).map(|i| i.v), Some(2));
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let old = vec![item("a", 1), item("a", 2)];
        let map = ListMap::new(&old, |i: &Item| (i.k,));
        assert_eq!(map.len(), 1);
        assert_eq!(map.with_matching_key(&item("a", 0)).map(|i| i.v), Some(1));
    }

    #[test]
    fn empty_old_list() {
        let old: Vec<Item> = Vec::new();
        let map = ListMap::new(&old, |i: &Item| (i.k,));
        assert!(map.is_empty());
        assert_eq!(map.with_matching_key(&item("a", 1)), None);
    }
}
