/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Plain text output format.

use std::fmt::Write;

use super::format::{strip_braces, Backend};
use crate::richtext::{Symbol, Tag};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl Backend for PlainText {
    fn name(&self) -> &'static str {
        "text"
    }

    fn text(&self, s: &str) -> String {
        strip_braces(s)
    }

    fn tag(&self, _tag: Tag, content: String) -> String {
        content
    }

    fn href(&self, _url: &str, content: String) -> String {
        content
    }

    fn symbol(&self, symbol: Symbol) -> &'static str {
        match symbol {
            Symbol::Ndash => "\u{2013}",
            Symbol::Newblock | Symbol::Nbsp => " ",
        }
    }

    fn write_prologue(&self, _out: &mut String, _widest_label: &str, _preamble: &str) {}

    fn write_entry(&self, out: &mut String, _key: &str, label: &str, text: &str) {
        let _ = writeln!(out, "[{label}] {text}");
    }

    fn write_epilogue(&self, _out: &mut String) {}
}
