/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Serialize a [`BibliographyData`] back to `.bib` source.

use std::fmt::Write as _;

use crate::database::{BibliographyData, Person};
use crate::error::DataError;
use crate::strings::BraceAwareChars;

/// Fail if `s` leaves a brace group open.
fn check_braces(s: &str) -> Result<(), DataError> {
    match BraceAwareChars::new(s).last() {
        Some(token) if token.depth != 0 => Err(DataError::UnmatchedBraces(s.to_string())),
        _ => Ok(()),
    }
}

/// Wrap a value in double quotes, or in braces when it contains a quote.
pub fn quote(s: &str) -> Result<String, DataError> {
    check_braces(s)?;
    if s.contains('"') {
        Ok(format!("{{{s}}}"))
    } else {
        Ok(format!("\"{s}\""))
    }
}

/// `von Last, Jr, First Middle`, keeping the separating commas only when the
/// surrounding parts are present.
fn format_person(person: &Person) -> String {
    let mut out = String::new();
    if !person.last.is_empty() {
        out.push_str(&person.prelast.iter().chain(&person.last).cloned().collect::<Vec<_>>().join(" "));
    }
    if !person.lineage.is_empty() {
        out.push_str(", ");
        out.push_str(&person.lineage.join(" "));
    }
    let first = person.bibtex_first();
    if !first.is_empty() {
        out.push_str(", ");
        out.push_str(&first.join(" "));
    }
    out
}

/// Render `data` as `.bib` text: the preamble first, then every entry with
/// its person roles ahead of its fields.
pub fn write_bib(data: &BibliographyData) -> Result<String, DataError> {
    let mut out = String::new();
    let preamble = data.preamble();
    if !preamble.is_empty() {
        let _ = write!(out, "@preamble{{{}}}\n\n", quote(&preamble)?);
    }
    for (key, entry) in data.entries.iter() {
        let _ = write!(out, "@{}{{{key}", entry.original_type);
        for (role, persons) in entry.persons.iter() {
            let names = persons.iter().map(format_person).collect::<Vec<_>>().join(" and ");
            let _ = write!(out, ",\n    {role} = {}", quote(&names)?);
        }
        for (name, value) in entry.fields.iter() {
            let _ = write!(out, ",\n    {name} = {}", quote(value)?);
        }
        out.push_str("\n}\n\n");
    }
    Ok(out)
}
