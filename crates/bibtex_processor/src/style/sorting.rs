/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Entry ordering for native styles.

use bibtex_core::config::SortingStyle;
use bibtex_core::{BibliographyData, Entry, Person};

/// Stable sort of `entries`; `none` keeps citation order.
pub fn sort_entries(style: SortingStyle, entries: &mut [&Entry], data: &BibliographyData) {
    match style {
        SortingStyle::None => {}
        SortingStyle::AuthorYearTitle => {
            entries.sort_by_cached_key(|entry| author_year_title_key(entry, data));
        }
    }
}

fn author_year_title_key(entry: &Entry, data: &BibliographyData) -> (String, String, String) {
    let role_key = |role: &str| data.persons(entry, role).map(persons_key);
    let author = match entry.entry_type.as_str() {
        "book" | "inbook" => role_key("author").or_else(|| role_key("editor")),
        _ => role_key("author"),
    };
    let field = |name: &str| {
        data.field(entry, name)
            .map(|v| v.into_owned())
            .unwrap_or_default()
    };
    (author.unwrap_or_default(), field("year"), field("title"))
}

fn persons_key(persons: &[Person]) -> String {
    persons
        .iter()
        .map(person_key)
        .collect::<Vec<_>>()
        .join("   ")
}

fn person_key(person: &Person) -> String {
    let last = person.prelast.iter().chain(&person.last);
    let first = person.first.iter().chain(&person.middle);
    [
        last.map(String::as_str).collect::<Vec<_>>().join(" "),
        first.map(String::as_str).collect::<Vec<_>>().join(" "),
        person.lineage.join(" "),
    ]
    .join("  ")
    .to_lowercase()
}
