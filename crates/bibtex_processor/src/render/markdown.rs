/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Markdown output format.

use std::fmt::Write;

use super::format::{strip_braces, Backend};
use crate::richtext::{Symbol, Tag};

#[derive(Debug, Clone, Copy, Default)]
pub struct Markdown;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '[' | ']' | '`' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl Backend for Markdown {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn text(&self, s: &str) -> String {
        escape(&strip_braces(s))
    }

    fn tag(&self, tag: Tag, content: String) -> String {
        match tag {
            Tag::Emph => format!("*{content}*"),
            Tag::Strong => format!("**{content}**"),
        }
    }

    fn href(&self, url: &str, content: String) -> String {
        format!("[{content}]({url})")
    }

    fn symbol(&self, symbol: Symbol) -> &'static str {
        match symbol {
            Symbol::Ndash => "&ndash;",
            Symbol::Newblock => "\n",
            Symbol::Nbsp => "&nbsp;",
        }
    }

    fn write_prologue(&self, _out: &mut String, _widest_label: &str, _preamble: &str) {}

    fn write_entry(&self, out: &mut String, _key: &str, label: &str, text: &str) {
        // two trailing spaces force a line break
        let _ = write!(out, "[{label}] {text}  \n");
    }

    fn write_epilogue(&self, _out: &mut String) {}
}
