/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Personal names split into BibTeX's four name parts.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::strings::{split_tex_string, split_words};

fn comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A,").expect("valid regex"))
}

/// The parts of a [`Person`]'s name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePart {
    First,
    Middle,
    /// The "von" part.
    Prelast,
    Last,
    /// The "Jr" part.
    Lineage,
}

/// A person's name.
///
/// Parsed from one of the three BibTeX forms:
///
/// - `First von Last`
/// - `von Last, First`
/// - `von Last, Jr, First`
///
/// Only commas at brace depth 0 separate the forms' segments, and the
/// "von" part is recognised by words starting in lower case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub first: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub middle: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prelast: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lineage: Vec<String>,
}

/// True if `s` has a cased character and all cased characters are lower
/// case.
fn is_lower(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

impl Person {
    /// Parse a name string.
    pub fn parse(name: &str) -> Result<Self, DataError> {
        let mut person = Person::default();
        let name = name.trim();
        if !name.is_empty() {
            person.parse_into(name)?;
        }
        Ok(person)
    }

    /// Build a person from explicit, space-separated parts.
    pub fn from_parts(first: &str, middle: &str, prelast: &str, last: &str, lineage: &str) -> Self {
        Person {
            first: split_words(first),
            middle: split_words(middle),
            prelast: split_words(prelast),
            last: split_words(last),
            lineage: split_words(lineage),
        }
    }

    fn parse_into(&mut self, name: &str) -> Result<(), DataError> {
        let segments = split_tex_string(name, comma_re(), true, false);
        match segments.as_slice() {
            [von_last, first] => {
                self.push_von_last(split_words(von_last));
                self.push_first_middle(split_words(first));
            }
            [von_last, lineage, first] => {
                self.push_von_last(split_words(von_last));
                self.lineage.extend(split_words(lineage));
                self.push_first_middle(split_words(first));
            }
            [_] => {
                let mut first_middle = split_words(name);
                let split = first_middle
                    .iter()
                    .position(|w| is_lower(w))
                    .unwrap_or(first_middle.len());
                let mut von_last = first_middle.split_off(split);
                if von_last.is_empty() {
                    if let Some(last) = first_middle.pop() {
                        von_last.push(last);
                    }
                }
                self.push_first_middle(first_middle);
                self.push_von_last(von_last);
            }
            _ => return Err(DataError::InvalidName(name.to_string())),
        }
        Ok(())
    }

    fn push_first_middle(&mut self, mut parts: Vec<String>) {
        if parts.is_empty() {
            return;
        }
        let rest = parts.split_off(1);
        self.first.extend(parts);
        self.middle.extend(rest);
    }

    /// Everything up to and including the last lower-case word is "von";
    /// the rest is the last name, which is never left empty.
    fn push_von_last(&mut self, mut von: Vec<String>) {
        let split = von.iter().rposition(|w| is_lower(w)).map_or(0, |i| i + 1);
        let mut last = von.split_off(split);
        if last.is_empty() {
            if let Some(word) = von.pop() {
                last.push(word);
            }
        }
        self.prelast.extend(von);
        self.last.extend(last);
    }

    pub fn part(&self, part: NamePart) -> &[String] {
        match part {
            NamePart::First => &self.first,
            NamePart::Middle => &self.middle,
            NamePart::Prelast => &self.prelast,
            NamePart::Last => &self.last,
            NamePart::Lineage => &self.lineage,
        }
    }

    /// First and middle names together; BibTeX's `f` name part.
    pub fn bibtex_first(&self) -> Vec<String> {
        self.first.iter().chain(&self.middle).cloned().collect()
    }

    /// Name part joined with spaces.
    pub fn part_as_text(&self, part: NamePart) -> String {
        self.part(part).join(" ")
    }
}

impl fmt::Display for Person {
    /// `von Last, Jr, First Middle`, omitting empty segments.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let von_last = self.prelast.iter().chain(&self.last).cloned().collect::<Vec<_>>().join(" ");
        let jr = self.lineage.join(" ");
        let first = self.bibtex_first().join(" ");
        let segments: Vec<&str> = [von_last.as_str(), jr.as_str(), first.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        f.write_str(&segments.join(", "))
    }
}

impl std::str::FromStr for Person {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Person::parse(s)
    }
}
