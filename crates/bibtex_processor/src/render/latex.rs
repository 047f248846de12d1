/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! LaTeX output: a `thebibliography` environment, as BibTeX writes it.

use std::fmt::Write;

use super::format::Backend;
use crate::richtext::{Symbol, Tag};

/// LaTeX renderer. Field text is already LaTeX and passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latex;

impl Backend for Latex {
    fn name(&self) -> &'static str {
        "latex"
    }

    fn text(&self, s: &str) -> String {
        s.to_string()
    }

    fn tag(&self, tag: Tag, content: String) -> String {
        match tag {
            Tag::Emph => format!(r"\emph{{{content}}}"),
            Tag::Strong => format!(r"\textbf{{{content}}}"),
        }
    }

    fn href(&self, url: &str, content: String) -> String {
        format!(r"\href{{{url}}}{{{content}}}")
    }

    fn symbol(&self, symbol: Symbol) -> &'static str {
        match symbol {
            Symbol::Ndash => "--",
            Symbol::Newblock => "\n\\newblock ",
            Symbol::Nbsp => "~",
        }
    }

    fn write_prologue(&self, out: &mut String, widest_label: &str, preamble: &str) {
        if !preamble.is_empty() {
            out.push_str(preamble);
            out.push('\n');
        }
        let _ = write!(out, "\\begin{{thebibliography}}{{{widest_label}}}");
    }

    fn write_entry(&self, out: &mut String, key: &str, label: &str, text: &str) {
        let _ = write!(out, "\n\n\\bibitem[{label}]{{{key}}}\n{text}");
    }

    fn write_epilogue(&self, out: &mut String) {
        out.push_str("\n\n\\end{thebibliography}\n");
    }
}
