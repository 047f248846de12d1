/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation labels.
//!
//! `alpha` follows the label algorithm of BibTeX's `alpha.bst`: the von and
//! last name initials of the authors (or editors), or the first three
//! letters of a single author's last name when the initials are too short,
//! then the last two digits of the year. Duplicates get `a`, `b`, ...
//! suffixes in output order.

use std::collections::HashMap;

use bibtex_core::config::LabelStyle;
use bibtex_core::strings::{bibtex_prefix, bibtex_purify};
use bibtex_core::{BibliographyData, Entry, Person};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::names::{FormatElement, NameFormat, NamePart, PartSelector};

/// Labels for `entries`, which must already be in output order.
pub fn format_labels(style: LabelStyle, entries: &[&Entry], data: &BibliographyData) -> Vec<String> {
    match style {
        LabelStyle::Number => (1..=entries.len()).map(|n| n.to_string()).collect(),
        LabelStyle::Alpha => {
            let labels: Vec<String> = entries.iter().map(|e| alpha_label(e, data)).collect();
            let mut totals: HashMap<&str, usize> = HashMap::new();
            for label in &labels {
                *totals.entry(label).or_default() += 1;
            }
            let mut seen: HashMap<&str, usize> = HashMap::new();
            labels
                .iter()
                .map(|label| {
                    if totals[label.as_str()] == 1 {
                        return label.clone();
                    }
                    let n = seen.entry(label).or_default();
                    let suffix = ('a'..='z').nth(*n).unwrap_or('z');
                    *n += 1;
                    format!("{label}{suffix}")
                })
                .collect()
        }
    }
}

fn alpha_label(entry: &Entry, data: &BibliographyData) -> String {
    let initials = initials_format();
    let persons = |role: &str| data.persons(entry, role).filter(|p| !p.is_empty());
    let field = |name: &str| data.field(entry, name);
    let key_prefix = || match field("key") {
        Some(key) => bibtex_prefix(&key, 3),
        None => entry.key.chars().take(3).collect(),
    };
    let organization = || {
        field("organization").map(|org| {
            let org = org.strip_prefix("The ").unwrap_or(&*org).to_string();
            bibtex_prefix(&org, 3)
        })
    };
    let names = |persons: &[Person]| lab_names(persons, &initials);
    let label = match entry.entry_type.as_str() {
        "book" | "inbook" => persons("author")
            .or_else(|| persons("editor"))
            .map(names)
            .unwrap_or_else(key_prefix),
        "proceedings" => persons("editor")
            .map(names)
            .or_else(|| field("key").map(|k| bibtex_prefix(&k, 3)))
            .or_else(organization)
            .unwrap_or_else(key_prefix),
        "manual" => persons("author")
            .map(names)
            .or_else(|| field("key").map(|k| bibtex_prefix(&k, 3)))
            .or_else(organization)
            .unwrap_or_else(key_prefix),
        _ => persons("author").map(names).unwrap_or_else(key_prefix),
    };
    match field("year") {
        Some(year) => {
            let chars: Vec<char> = year.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
            label + &tail
        }
        None => label,
    }
}

fn is_others(person: &Person) -> bool {
    person.last == ["others"] && person.first.is_empty()
}

/// `{v{}}{l{}}`: von and last initials with no delimiters.
fn initials_format() -> NameFormat {
    let initials = |selector| {
        FormatElement::Part(NamePart {
            pre_text: String::new(),
            selector: Some(selector),
            abbreviate: true,
            delimiter: Some(String::new()),
            post_text: String::new(),
            tie: None,
        })
    };
    NameFormat {
        elements: vec![initials(PartSelector::Von), initials(PartSelector::Last)],
    }
}

/// ASCII letters and digits only, accents and TeX commands dropped.
fn alphanumeric(s: &str) -> String {
    bibtex_purify(s)
        .nfd()
        .filter(|c| !is_combining_mark(*c) && c.is_ascii_alphanumeric())
        .collect()
}

fn lab_names(persons: &[Person], initials: &NameFormat) -> String {
    match persons {
        [] => String::new(),
        [person] => {
            let result = alphanumeric(&initials.format(person));
            if result.chars().count() < 2 {
                alphanumeric(&person.last.join(" ")).chars().take(3).collect()
            } else {
                result
            }
        }
        _ => {
            let shown = if persons.len() > 4 { 3 } else { persons.len() };
            let mut result = String::new();
            for (i, person) in persons.iter().take(shown).enumerate() {
                if i + 1 == persons.len() && is_others(person) {
                    result.push('+');
                } else {
                    result.push_str(&alphanumeric(&initials.format(person)));
                }
            }
            if persons.len() > 4 {
                result.push('+');
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, entry_type: &str, authors: &[&str], year: Option<&str>) -> (String, Entry) {
        let mut entry = Entry::new(entry_type);
        for author in authors {
            entry.add_person(Person::parse(author).unwrap(), "author");
        }
        if let Some(year) = year {
            entry.fields.insert("year", year.to_string());
        }
        (key.to_string(), entry)
    }

    fn labels(style: LabelStyle, entries: Vec<(String, Entry)>) -> Vec<String> {
        let keys: Vec<String> = entries.iter().map(|(k, _)| k.clone()).collect();
        let data = BibliographyData::from_entries(entries).unwrap();
        let entries: Vec<&Entry> = keys.iter().map(|k| data.get(k).unwrap()).collect();
        format_labels(style, &entries, &data)
    }

    #[test]
    fn test_alpha_labels() {
        let result = labels(
            LabelStyle::Alpha,
            vec![
                entry("a", "book", &["Donald E. Knuth"], Some("1986")),
                entry("b", "book", &["Donald E. Knuth"], Some("1986")),
                entry("c", "article", &["Leslie Lamport", "others"], Some("1994")),
                entry("d", "article", &["A. Abel", "B. Baker", "C. Cole", "D. Dunn", "E. Eve"], None),
                entry("e", "article", &["Kurt G{\\\"o}del"], Some("31")),
                entry("nokey", "misc", &[], None),
                entry("f", "article", &["Ludwig van Beethoven"], Some("1800")),
            ],
        );
        assert_eq!(
            result,
            ["Knu86a", "Knu86b", "L+94", "ABC+", "God31", "nok", "vB00"]
        );
    }

    #[test]
    fn test_alpha_von_and_hyphenated_initials() {
        let result = labels(
            LabelStyle::Alpha,
            vec![
                entry("a", "article", &["John von Neumann"], Some("1966")),
                entry("b", "article", &["Donald Knuth", "John von Neumann"], Some("1966")),
                entry("c", "article", &["F. Phidias Phony-Baloney"], Some("1966")),
                entry("d", "article", &["Per Brinch Hansen"], Some("1973")),
            ],
        );
        assert_eq!(result, ["vN66", "KvN66", "PB66", "Han73"]);
    }

    #[test]
    fn test_initials_format_matches_parsed_format() {
        assert_eq!(initials_format(), NameFormat::parse("{v{}}{l{}}").unwrap());
    }

    #[test]
    fn test_suffixes_stop_at_z() {
        let entries = (0..28)
            .map(|i| entry(&format!("k{i}"), "article", &["Donald E. Knuth"], Some("1984")))
            .collect();
        let result = labels(LabelStyle::Alpha, entries);
        assert_eq!(result[0], "Knu84a");
        assert_eq!(result[25], "Knu84z");
        assert_eq!(result[26], "Knu84z");
        assert_eq!(result[27], "Knu84z");
    }

    #[test]
    fn test_number_labels() {
        let result = labels(
            LabelStyle::Number,
            vec![entry("a", "misc", &[], None), entry("b", "misc", &[], None)],
        );
        assert_eq!(result, ["1", "2"]);
    }
}
