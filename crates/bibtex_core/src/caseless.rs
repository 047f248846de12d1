/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Case-insensitive keys and collections.
//!
//! BibTeX treats citation keys, field names, macro names and style
//! identifiers case-insensitively while still remembering how a name was
//! first written. [`CaseInsensitiveMap`] keeps insertion order (it is backed
//! by [`IndexMap`]) and the casing of the first insertion of each key.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::{Equivalent, IndexMap, IndexSet};

/// An owned key compared and hashed without regard to case.
#[derive(Clone)]
pub struct CaselessKey(String);

impl CaselessKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as it was originally written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn hash_folded<H: Hasher>(s: &str, state: &mut H) {
    for c in s.chars().flat_map(char::to_lowercase) {
        c.hash(state);
    }
    // terminator, like `str`'s own Hash impl
    0xffu8.hash(state);
}

fn eq_folded(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl Hash for CaselessKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_folded(&self.0, state);
    }
}

impl PartialEq for CaselessKey {
    fn eq(&self, other: &Self) -> bool {
        eq_folded(&self.0, &other.0)
    }
}

impl Eq for CaselessKey {}

impl fmt::Debug for CaselessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for CaselessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaselessKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CaselessKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A borrowed lookup key; hashes identically to [`CaselessKey`].
#[derive(Debug, Clone, Copy)]
pub struct Caseless<'a>(pub &'a str);

impl Hash for Caseless<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_folded(self.0, state);
    }
}

impl Equivalent<CaselessKey> for Caseless<'_> {
    fn equivalent(&self, key: &CaselessKey) -> bool {
        eq_folded(self.0, &key.0)
    }
}

/// Ordered map with case-insensitive string keys.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveMap<V> {
    inner: IndexMap<CaselessKey, V>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and original
    /// casing; its value is replaced and returned.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(slot) = self.inner.get_mut(&Caseless(&key)) {
            return Some(std::mem::replace(slot, value));
        }
        self.inner.insert(CaselessKey(key), value);
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.inner.get(&Caseless(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.inner.get_mut(&Caseless(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(&Caseless(key))
    }

    /// The key as first inserted, for a lookup in any casing.
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        self.inner
            .get_key_value(&Caseless(key))
            .map(|(k, _)| k.as_str())
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.inner.shift_remove(&Caseless(key))
    }

    /// Get the value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        let index = match self.inner.get_index_of(&Caseless(key)) {
            Some(index) => index,
            None => self.inner.insert_full(CaselessKey::new(key), default()).0,
        };
        &mut self.inner[index]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.inner.keys().map(CaselessKey::as_str)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.inner.values()
    }

    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.inner.values_mut()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &V)> + ExactSizeIterator {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: PartialEq> PartialEq for CaseInsensitiveMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<V: Eq> Eq for CaseInsensitiveMap<V> {}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseInsensitiveMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for CaseInsensitiveMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V> IntoIterator for CaseInsensitiveMap<V> {
    type Item = (String, V);
    type IntoIter = std::iter::Map<
        indexmap::map::IntoIter<CaselessKey, V>,
        fn((CaselessKey, V)) -> (String, V),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner
            .into_iter()
            .map(unwrap_key as fn((CaselessKey, V)) -> (String, V))
    }
}

fn unwrap_key<V>((key, value): (CaselessKey, V)) -> (String, V) {
    (key.0, value)
}

/// Ordered set of case-insensitive strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveSet {
    inner: IndexSet<CaselessKey>,
}

impl CaseInsensitiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if an equal key (in any casing) was already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.inner.insert(CaselessKey(key.into()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(&Caseless(key))
    }

    /// The stored casing of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(&Caseless(key)).map(CaselessKey::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.inner.iter().map(CaselessKey::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CaseInsensitiveSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for CaseInsensitiveSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let mut map = CaseInsensitiveMap::new();
        map.insert("Title", "T1");
        assert_eq!(map.get("TITLE"), Some(&"T1"));
        assert_eq!(map.get("title"), Some(&"T1"));
        assert!(map.contains_key("tItLe"));
    }

    #[test]
    fn test_first_casing_and_position_win() {
        let mut map = CaseInsensitiveMap::new();
        map.insert("Knuth84", 1);
        map.insert("other", 2);
        map.insert("KNUTH84", 3);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Knuth84", "other"]);
        assert_eq!(map.get("knuth84"), Some(&3));
        assert_eq!(map.canonical_key("KNUTH84"), Some("Knuth84"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map: CaseInsensitiveMap<i32> =
            [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(map.remove("B"), Some(2));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_equality_is_order_and_case_insensitive() {
        let a: CaseInsensitiveMap<i32> = [("X", 1), ("y", 2)].into_iter().collect();
        let b: CaseInsensitiveMap<i32> = [("Y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_keeps_first_casing() {
        let mut set = CaseInsensitiveSet::new();
        assert!(set.insert("Foo"));
        assert!(!set.insert("FOO"));
        assert_eq!(set.get("foo"), Some("Foo"));
        assert_eq!(set.len(), 1);
    }
}
