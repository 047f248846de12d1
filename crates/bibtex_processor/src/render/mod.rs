/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Output backends for the native style path.

pub mod format;
pub mod html;
pub mod latex;
pub mod markdown;
pub mod plain;

use bibtex_core::config::OutputBackend;

pub use format::Backend;
pub use html::Html;
pub use latex::Latex;
pub use markdown::Markdown;
pub use plain::PlainText;

use crate::bibliography::FormattedEntry;

/// The backend implementing `kind`.
pub fn backend_for(kind: OutputBackend) -> Box<dyn Backend> {
    match kind {
        OutputBackend::Latex => Box::new(Latex),
        OutputBackend::Html => Box::new(Html),
        OutputBackend::Text => Box::new(PlainText),
        OutputBackend::Markdown => Box::new(Markdown),
    }
}

/// Lay out a complete document from already rendered entries.
pub fn write_document(backend: &dyn Backend, entries: &[FormattedEntry], preamble: &str) -> String {
    let widest_label = entries
        .iter()
        .map(|e| e.label.as_str())
        .max_by_key(|label| label.chars().count())
        .unwrap_or("");
    let mut out = String::new();
    backend.write_prologue(&mut out, widest_label, preamble);
    for entry in entries {
        backend.write_entry(&mut out, &entry.key, &entry.label, &entry.text);
    }
    backend.write_epilogue(&mut out);
    out
}
