/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The result of formatting a bibliography.

use std::fmt;

use serde::Serialize;

/// One formatted reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedEntry {
    pub key: String,
    /// The citation label (`Knu84`, `3`, ...).
    pub label: String,
    /// The entry rendered in the output format.
    pub text: String,
}

/// A formatted reference list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedBibliography {
    /// Entries in output order.
    pub entries: Vec<FormattedEntry>,
    /// The complete output document: `.bbl` text for `.bst` styles, the
    /// backend's markup for native styles.
    pub text: String,
    /// Recoverable problems reported during the run.
    pub warnings: Vec<String>,
}

impl FormattedBibliography {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&FormattedEntry> {
        self.entries.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FormattedBibliography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
