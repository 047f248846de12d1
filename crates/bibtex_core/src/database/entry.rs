/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use std::collections::HashMap;

use crate::caseless::CaseInsensitiveMap;
use crate::database::person::Person;

/// Case-insensitive field name to value map.
pub type FieldDict = CaseInsensitiveMap<String>;

/// Value of an entry-scoped style variable (`ENTRY { } { ints } { strs }`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Integer(i64),
    String(String),
}

/// A bibliography entry.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    /// The citation key, assigned when the entry is added to a
    /// [`BibliographyData`](crate::database::BibliographyData).
    pub key: String,
    /// Lower-cased entry type.
    pub entry_type: String,
    /// The entry type as written in the source.
    pub original_type: String,
    pub fields: FieldDict,
    pub persons: CaseInsensitiveMap<Vec<Person>>,
    /// Scratch space for the style interpreter's entry variables, keyed by
    /// lower-cased variable name. Not part of the entry's identity.
    pub vars: HashMap<String, EntryValue>,
}

impl Entry {
    pub fn new(entry_type: &str) -> Self {
        Self {
            entry_type: entry_type.to_lowercase(),
            original_type: entry_type.to_string(),
            ..Self::default()
        }
    }

    pub fn with_fields<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in fields {
            self.fields.insert(name, value.into());
        }
        self
    }

    pub fn with_persons(mut self, role: &str, persons: impl IntoIterator<Item = Person>) -> Self {
        for person in persons {
            self.add_person(person, role);
        }
        self
    }

    pub fn add_person(&mut self, person: Person, role: &str) {
        self.persons.get_or_insert_with(role, Vec::new).push(person);
    }

    /// A locally stored field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The `crossref` target key, if any.
    pub fn crossref(&self) -> Option<&str> {
        self.field("crossref")
    }

    /// Persons of `role` rendered as a BibTeX name list.
    pub fn persons_as_text(&self, role: &str) -> Option<String> {
        self.persons.get(role).map(|persons| {
            persons
                .iter()
                .map(Person::to_string)
                .collect::<Vec<_>>()
                .join(" and ")
        })
    }

    /// A field value, falling back to the persons of a role with that name.
    pub fn local_value(&self, name: &str) -> Option<String> {
        self.field(name)
            .map(str::to_string)
            .or_else(|| self.persons_as_text(name))
    }

    /// A copy with type, field names and person roles lower-cased.
    pub fn lower(&self) -> Entry {
        Entry {
            key: self.key.to_lowercase(),
            entry_type: self.entry_type.clone(),
            original_type: self.original_type.to_lowercase(),
            fields: self
                .fields
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
            persons: self
                .persons
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
            vars: HashMap::new(),
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.entry_type == other.entry_type
            && self.fields == other.fields
            && self.persons == other.persons
    }
}

impl Eq for Entry {}
