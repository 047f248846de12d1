/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The bibliography database: entries keyed case-insensitively by citation
//! key, the collected `@preamble` text and the set of wanted citations.

mod entry;
mod person;

use std::borrow::Cow;

pub use entry::{Entry, EntryValue, FieldDict};
pub use person::{NamePart, Person};

use crate::caseless::{CaseInsensitiveMap, CaseInsensitiveSet};
use crate::error::{DataError, Diagnostics, Result};

/// Default number of citing entries needed to auto-cite a crossref target.
pub const DEFAULT_MIN_CROSSREFS: usize = 2;

#[derive(Debug, Clone)]
pub struct BibliographyData {
    pub entries: CaseInsensitiveMap<Entry>,
    preamble: Vec<String>,
    /// `None` means every entry is wanted.
    wanted_entries: Option<CaseInsensitiveSet>,
    /// Cited keys, used to give entries the casing they were cited with.
    citations: CaseInsensitiveSet,
    pub min_crossrefs: usize,
}

impl Default for BibliographyData {
    fn default() -> Self {
        Self {
            entries: CaseInsensitiveMap::new(),
            preamble: Vec::new(),
            wanted_entries: None,
            citations: CaseInsensitiveSet::new(),
            min_crossrefs: DEFAULT_MIN_CROSSREFS,
        }
    }
}

impl PartialEq for BibliographyData {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.preamble == other.preamble
    }
}

impl BibliographyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// A database that only accepts the given citation keys (plus whatever
    /// they cross-reference). A `*` key accepts everything.
    pub fn with_wanted_entries<S: Into<String>>(
        wanted: impl IntoIterator<Item = S>,
        min_crossrefs: usize,
    ) -> Self {
        let wanted: CaseInsensitiveSet = wanted.into_iter().collect();
        Self {
            citations: wanted.clone(),
            wanted_entries: Some(wanted),
            min_crossrefs,
            ..Self::default()
        }
    }

    /// Build a database from `(key, entry)` pairs, failing on repeated keys.
    pub fn from_entries<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, Entry)>,
    ) -> std::result::Result<Self, DataError> {
        let mut data = Self::new();
        for (key, entry) in entries {
            data.add_entry(key, entry)?;
        }
        Ok(data)
    }

    pub fn add_to_preamble(&mut self, value: impl Into<String>) {
        self.preamble.push(value.into());
    }

    /// The concatenated `@preamble` values.
    pub fn preamble(&self) -> String {
        self.preamble.concat()
    }

    pub fn preamble_parts(&self) -> &[String] {
        &self.preamble
    }

    pub fn want_entry(&self, key: &str) -> bool {
        match &self.wanted_entries {
            None => true,
            Some(wanted) => wanted.contains(key) || wanted.contains("*"),
        }
    }

    /// The casing a key was cited with, or the key itself.
    pub fn canonical_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.citations.get(key).unwrap_or(key)
    }

    /// Add an entry under `key`. Unwanted entries are ignored; a key that
    /// is already present is an error and the new entry is dropped.
    pub fn add_entry(
        &mut self,
        key: impl Into<String>,
        mut entry: Entry,
    ) -> std::result::Result<(), DataError> {
        let key = key.into();
        if !self.want_entry(&key) {
            return Ok(());
        }
        if self.entries.contains_key(&key) {
            return Err(DataError::RepeatedEntry(key));
        }
        entry.key = self.canonical_key(&key).to_string();
        if let (Some(crossref), Some(wanted)) = (entry.crossref(), self.wanted_entries.as_mut()) {
            wanted.insert(crossref.to_string());
        }
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry named by `entry`'s `crossref` field.
    pub fn crossref_of(&self, entry: &Entry) -> Option<&Entry> {
        entry.crossref().and_then(|key| self.entries.get(key))
    }

    /// Look up a field of `entry`: a local field, then a person role of that
    /// name rendered as a name list, then the same on the entry's crossref
    /// target. Exactly one crossref hop is followed.
    pub fn field<'a>(&'a self, entry: &'a Entry, name: &str) -> Option<Cow<'a, str>> {
        if let Some(value) = entry.field(name) {
            return Some(Cow::Borrowed(value));
        }
        if let Some(text) = entry.persons_as_text(name) {
            return Some(Cow::Owned(text));
        }
        let parent = self.crossref_of(entry)?;
        match parent.field(name) {
            Some(value) => Some(Cow::Borrowed(value)),
            None => parent.persons_as_text(name).map(Cow::Owned),
        }
    }

    /// Persons of `role` for `entry`, inherited from the crossref target
    /// when the entry has none.
    pub fn persons<'a>(&'a self, entry: &'a Entry, role: &str) -> Option<&'a [Person]> {
        entry
            .persons
            .get(role)
            .or_else(|| self.crossref_of(entry)?.persons.get(role))
            .map(Vec::as_slice)
    }

    /// Entries that are not cited themselves but are cross-referenced by at
    /// least `min_crossrefs` cited entries. Newly added targets are checked
    /// for crossrefs of their own; every key is returned at most once.
    pub fn crossreferenced_citations(
        &self,
        citations: &[String],
        min_crossrefs: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<String>> {
        let mut cited: CaseInsensitiveSet = citations.iter().cloned().collect();
        let mut counts: CaseInsensitiveMap<usize> = CaseInsensitiveMap::new();
        let mut added = Vec::new();
        let mut queue: Vec<String> = citations.to_vec();
        let mut next = 0;
        while next < queue.len() {
            let citation = queue[next].clone();
            next += 1;
            let Some(crossref) = self.entries.get(&citation).and_then(Entry::crossref) else {
                continue;
            };
            let Some(target) = self.entries.get(crossref) else {
                diagnostics.report(DataError::BadCrossref {
                    key: citation,
                    crossref: crossref.to_string(),
                })?;
                continue;
            };
            let count = counts.get_or_insert_with(&target.key, || 0);
            *count += 1;
            if *count >= min_crossrefs && !cited.contains(&target.key) {
                cited.insert(target.key.clone());
                added.push(target.key.clone());
                queue.push(target.key.clone());
            }
        }
        Ok(added)
    }

    /// Replace `*` with every database key, in database order, dropping
    /// duplicates (compared case-insensitively).
    pub fn expand_wildcard_citations(&self, citations: &[String]) -> Vec<String> {
        let mut seen = CaseInsensitiveSet::new();
        let mut expanded = Vec::new();
        for citation in citations {
            if citation == "*" {
                for key in self.entries.keys() {
                    if seen.insert(key) {
                        expanded.push(key.to_string());
                    }
                }
            } else if seen.insert(citation.as_str()) {
                expanded.push(citation.clone());
            }
        }
        expanded
    }

    /// Wildcard expansion followed by crossref expansion.
    pub fn add_extra_citations(
        &self,
        citations: &[String],
        min_crossrefs: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<String>> {
        let mut expanded = self.expand_wildcard_citations(citations);
        let crossrefs = self.crossreferenced_citations(&expanded, min_crossrefs, diagnostics)?;
        expanded.extend(crossrefs);
        Ok(expanded)
    }

    /// A copy with keys, field names and person roles lower-cased.
    pub fn lower(&self) -> BibliographyData {
        BibliographyData {
            entries: self
                .entries
                .iter()
                .map(|(key, entry)| (key.to_lowercase(), entry.lower()))
                .collect(),
            preamble: self.preamble.clone(),
            wanted_entries: self.wanted_entries.clone(),
            citations: self.citations.clone(),
            min_crossrefs: self.min_crossrefs,
        }
    }
}
