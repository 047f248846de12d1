/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Output backend trait for the native style path.

use crate::richtext::{Symbol, Tag};

/// Translates rich-text fragments and whole bibliographies into one
/// markup language.
///
/// The per-fragment methods are used by [`Text::render`](crate::richtext::Text::render);
/// the `write_*` methods lay out the complete document.
pub trait Backend {
    /// Short name used on the command line (`latex`, `html`, ...).
    fn name(&self) -> &'static str;

    /// Escape a piece of field text.
    fn text(&self, s: &str) -> String;

    fn tag(&self, tag: Tag, content: String) -> String;

    fn href(&self, url: &str, content: String) -> String;

    fn symbol(&self, symbol: Symbol) -> &'static str;

    /// Document opening. `widest_label` is the longest label in the list.
    fn write_prologue(&self, out: &mut String, widest_label: &str, preamble: &str);

    fn write_entry(&self, out: &mut String, key: &str, label: &str, text: &str);

    fn write_epilogue(&self, out: &mut String);
}

/// Drop the grouping braces of BibTeX field text.
pub(crate) fn strip_braces(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '{' | '}')).collect()
}
