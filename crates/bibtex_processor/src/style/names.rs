/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Name styles: how each person in a name list is written.

use bibtex_core::config::NameStyle;
use bibtex_core::{Person, Result};

use crate::names::NameFormat;
use crate::richtext::Text;

/// The name-format string behind a style.
pub fn format_string(style: NameStyle, abbreviate: bool) -> &'static str {
    match (style, abbreviate) {
        (NameStyle::Plain, false) => "{ff~}{vv~}{ll}{, jj}",
        (NameStyle::Plain, true) => "{f.~}{vv~}{ll}{, jj}",
        (NameStyle::Lastfirst, false) => "{vv~}{ll}{, jj}{, ff}",
        (NameStyle::Lastfirst, true) => "{vv~}{ll}{, jj}{, f.}",
    }
}

#[derive(Debug, Clone)]
pub struct NameFormatter {
    format: NameFormat,
}

fn is_others(person: &Person) -> bool {
    person.last == ["others"]
        && person.first.is_empty()
        && person.middle.is_empty()
        && person.prelast.is_empty()
}

impl NameFormatter {
    pub fn new(style: NameStyle, abbreviate: bool) -> Result<Self> {
        Ok(Self {
            format: NameFormat::parse(format_string(style, abbreviate))?,
        })
    }

    pub fn format_person(&self, person: &Person) -> Text {
        Text::with_ties(&self.format.format(person))
    }

    /// `A`, `A and B`, `A, B, and C`; a trailing `others` becomes
    /// "et al.".
    pub fn format_persons(&self, persons: &[Person]) -> Text {
        let (persons, et_al) = match persons.split_last() {
            Some((last, rest)) if is_others(last) && !rest.is_empty() => (rest, true),
            _ => (persons, false),
        };
        let names: Vec<Text> = persons.iter().map(|p| self.format_person(p)).collect();
        let mut text = match names.len() {
            0 | 1 => Text::join(names, &Text::new()),
            2 => Text::join(names, &Text::plain(" and ")),
            n => {
                let mut names = names;
                let last = names.split_off(n - 1);
                let mut text = Text::join(names, &Text::plain(", "));
                text.append(Text::plain(", and "));
                text.append(Text::join(last, &Text::new()));
                text
            }
        };
        if et_al {
            text.append(Text::with_ties(" et~al."));
        }
        text
    }
}
