/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! HTML output: a definition list of labels and entries.

use std::fmt::Write;

use super::format::{strip_braces, Backend};
use crate::richtext::{Symbol, Tag};

const PROLOGUE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Bibliography</title>
</head>
<body>
<dl>
"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct Html;

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

impl Backend for Html {
    fn name(&self) -> &'static str {
        "html"
    }

    fn text(&self, s: &str) -> String {
        escape(&strip_braces(s))
    }

    fn tag(&self, tag: Tag, content: String) -> String {
        match tag {
            Tag::Emph => format!("<em>{content}</em>"),
            Tag::Strong => format!("<strong>{content}</strong>"),
        }
    }

    fn href(&self, url: &str, content: String) -> String {
        format!(r#"<a href="{}">{content}</a>"#, escape(url))
    }

    fn symbol(&self, symbol: Symbol) -> &'static str {
        match symbol {
            Symbol::Ndash => "&ndash;",
            Symbol::Newblock => "\n",
            Symbol::Nbsp => "&nbsp;",
        }
    }

    fn write_prologue(&self, out: &mut String, _widest_label: &str, _preamble: &str) {
        out.push_str(PROLOGUE);
    }

    fn write_entry(&self, out: &mut String, _key: &str, label: &str, text: &str) {
        let _ = writeln!(out, "<dt>{}</dt>\n<dd>{text}</dd>", escape(label));
    }

    fn write_epilogue(&self, out: &mut String) {
        out.push_str("</dl>\n</body>\n</html>\n");
    }
}
