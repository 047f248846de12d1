/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Native styles: bibliographies formatted by Rust code instead of a
//! `.bst` program.
//!
//! A [`NativeStyle`] combines a label style, a sorting style and a name
//! style with the [`unsrt`] entry layout; the result is rendered by one of
//! the [`render`](crate::render) backends.

pub mod labels;
pub mod names;
pub mod sorting;
pub mod unsrt;

use bibtex_core::config::{LabelStyle, NativeStyleConfig, SortingStyle};
use bibtex_core::{BibTeXError, BibliographyData, Config, Diagnostics, Entry};

use crate::bibliography::{FormattedBibliography, FormattedEntry};
use crate::error::Result;
use crate::render::{backend_for, write_document};
use crate::richtext::Text;

use names::NameFormatter;
use unsrt::EntryFormatter;

/// An entry formatted but not yet rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledEntry {
    pub key: String,
    pub label: String,
    pub text: Text,
}

#[derive(Debug, Clone)]
pub struct NativeStyle {
    label_style: LabelStyle,
    sorting_style: SortingStyle,
    names: NameFormatter,
}

impl NativeStyle {
    pub fn new(config: &NativeStyleConfig) -> Result<Self> {
        Ok(Self {
            label_style: config.label_style,
            sorting_style: config.sorting_style,
            names: NameFormatter::new(config.name_style, config.abbreviate_names)?,
        })
    }

    /// Sort, label and lay out `entries`.
    pub fn format_entries(
        &self,
        entries: &[&Entry],
        data: &BibliographyData,
    ) -> Result<Vec<StyledEntry>> {
        let mut sorted = entries.to_vec();
        sorting::sort_entries(self.sorting_style, &mut sorted, data);
        let labels = labels::format_labels(self.label_style, &sorted, data);
        let formatter = EntryFormatter::new(data, &self.names);
        sorted
            .into_iter()
            .zip(labels)
            .map(|(entry, label)| {
                Ok(StyledEntry {
                    key: entry.key.clone(),
                    label,
                    text: formatter.format_entry(entry)?,
                })
            })
            .collect()
    }
}

/// Format the cited entries of `data` with the native style and backend
/// selected in `config`.
///
/// Citations are expanded the same way `READ` expands them for `.bst`
/// styles: `*` selects every entry, and entries cross-referenced often
/// enough are added. Unknown keys are reported as missing entries.
pub fn format_bibliography(
    data: &BibliographyData,
    citations: &[String],
    config: &Config,
) -> Result<FormattedBibliography> {
    let mut diagnostics = Diagnostics::new(config.error_policy());
    let citations = data.add_extra_citations(citations, config.min_crossrefs, &mut diagnostics)?;
    let mut entries = Vec::with_capacity(citations.len());
    for key in &citations {
        match data.get(key) {
            Some(entry) => entries.push(entry),
            None => diagnostics.report(BibTeXError::MissingEntry(key.clone()))?,
        }
    }
    tracing::debug!(entries = entries.len(), "formatting with native style");

    let style = NativeStyle::new(&config.native)?;
    let backend = backend_for(config.native.output_backend);
    let entries: Vec<FormattedEntry> = style
        .format_entries(&entries, data)?
        .into_iter()
        .map(|styled| FormattedEntry {
            text: styled.text.render(backend.as_ref()),
            key: styled.key,
            label: styled.label,
        })
        .collect();
    let text = write_document(backend.as_ref(), &entries, &data.preamble());
    Ok(FormattedBibliography {
        entries,
        text,
        warnings: diagnostics.take_warnings(),
    })
}
