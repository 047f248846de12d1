/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! An `unsrt.bst`-like layout for the common entry types.
//!
//! Every entry is a sequence of blocks (sentences) separated by
//! [`Symbol::Newblock`]. Types without a layout of their own use the
//! `misc` layout.

use bibtex_core::strings::{change_case, CaseMode};
use bibtex_core::{BibliographyData, Entry};

use super::names::NameFormatter;
use crate::error::{ProcessorError, Result};
use crate::richtext::{Symbol, Tag, Text};

fn sentence(parts: impl IntoIterator<Item = Text>) -> Text {
    Text::join(parts, &Text::plain(", ")).add_period()
}

fn words(parts: impl IntoIterator<Item = Text>) -> Text {
    Text::join(parts, &Text::plain(" "))
}

fn emph(text: Text) -> Text {
    Text::tagged(Tag::Emph, text)
}

/// Lower-case a title except for its first letter and braced text.
fn title_case(title: &str) -> Text {
    Text::plain(change_case(title, CaseMode::Title)).capfirst()
}

pub struct EntryFormatter<'a> {
    data: &'a BibliographyData,
    names: &'a NameFormatter,
}

impl<'a> EntryFormatter<'a> {
    pub fn new(data: &'a BibliographyData, names: &'a NameFormatter) -> Self {
        Self { data, names }
    }

    pub fn format_entry(&self, entry: &Entry) -> Result<Text> {
        let blocks = match entry.entry_type.as_str() {
            "article" => self.article(entry)?,
            "book" | "inbook" => self.book(entry)?,
            "inproceedings" | "conference" | "incollection" => self.in_collection(entry)?,
            _ => self.misc(entry),
        };
        Ok(Text::join(blocks, &Text::symbol(Symbol::Newblock)))
    }

    fn field(&self, entry: &Entry, name: &str) -> Option<Text> {
        self.data
            .field(entry, name)
            .filter(|value| !value.is_empty())
            .map(|value| Text::plain(value.into_owned()))
    }

    fn raw_field(&self, entry: &Entry, name: &str) -> Option<String> {
        self.data.field(entry, name).map(|v| v.into_owned())
    }

    fn required(&self, entry: &Entry, name: &str) -> Result<Text> {
        self.field(entry, name).ok_or_else(|| missing(entry, name))
    }

    fn names(&self, entry: &Entry, role: &str) -> Option<Text> {
        self.data
            .persons(entry, role)
            .filter(|persons| !persons.is_empty())
            .map(|persons| self.names.format_persons(persons))
    }

    fn required_names(&self, entry: &Entry, role: &str) -> Result<Text> {
        self.names(entry, role).ok_or_else(|| missing(entry, role))
    }

    /// Editor names followed by "editor" or "editors".
    fn editors(&self, entry: &Entry) -> Option<Text> {
        let persons = self.data.persons(entry, "editor")?;
        if persons.is_empty() {
            return None;
        }
        let noun = if persons.len() > 1 { "editors" } else { "editor" };
        Some(Text::join(
            [self.names.format_persons(persons), Text::plain(noun)],
            &Text::plain(", "),
        ))
    }

    fn title(&self, entry: &Entry, name: &str) -> Result<Text> {
        let title = self.raw_field(entry, name).ok_or_else(|| missing(entry, name))?;
        Ok(sentence([title_case(&title)]))
    }

    fn date(&self, entry: &Entry) -> Result<Text> {
        Ok(words([self.field(entry, "month").unwrap_or_default(), self.required(entry, "year")?]))
    }

    fn pages(&self, entry: &Entry) -> Option<Text> {
        self.raw_field(entry, "pages")
            .filter(|pages| !pages.is_empty())
            .map(|pages| Text::dashify(&pages))
    }

    fn note(&self, entry: &Entry) -> Text {
        sentence(self.field(entry, "note"))
    }

    fn web_refs(&self, entry: &Entry) -> Vec<Text> {
        let mut blocks = Vec::new();
        if let Some(url) = self.raw_field(entry, "url").filter(|u| !u.is_empty()) {
            let mut text = Text::plain("URL: ");
            text.append(Text::href(url.clone(), Text::plain(url)));
            blocks.push(sentence([text]));
        }
        if let Some(doi) = self.raw_field(entry, "doi").filter(|d| !d.is_empty()) {
            let mut text = Text::plain("DOI: ");
            text.append(Text::href(format!("https://doi.org/{doi}"), Text::plain(doi)));
            blocks.push(sentence([text]));
        }
        blocks
    }

    /// `Volume 3 of Series`, `Number 4 in Series` or just `Series`.
    fn volume_and_series(&self, entry: &Entry) -> Option<Text> {
        let series = self.field(entry, "series");
        let (head, joiner) = if let Some(volume) = self.field(entry, "volume") {
            (words([Text::plain("Volume"), volume]), "of")
        } else if let Some(number) = self.field(entry, "number") {
            (words([Text::plain("Number"), number]), "in")
        } else {
            return series;
        };
        Some(match series {
            Some(series) => words([head, Text::plain(joiner), series]),
            None => head,
        })
    }

    fn article(&self, entry: &Entry) -> Result<Vec<Text>> {
        let volume_and_pages = match (self.field(entry, "volume"), self.pages(entry)) {
            (Some(volume), pages) => {
                let mut text = volume;
                if let Some(number) = self.field(entry, "number") {
                    text.append(Text::plain("("));
                    text.append(number);
                    text.append(Text::plain(")"));
                }
                if let Some(pages) = pages {
                    text.append(Text::plain(":"));
                    text.append(pages);
                }
                Some(text)
            }
            (None, Some(pages)) => Some(words([Text::plain("pages"), pages])),
            (None, None) => None,
        };
        let mut blocks = vec![
            sentence([self.required_names(entry, "author")?]),
            self.title(entry, "title")?,
            sentence([
                emph(self.required(entry, "journal")?),
                volume_and_pages.unwrap_or_default(),
                self.date(entry)?,
            ]),
            self.note(entry),
        ];
        blocks.extend(self.web_refs(entry));
        Ok(blocks)
    }

    fn book(&self, entry: &Entry) -> Result<Vec<Text>> {
        let author_or_editor = match self.names(entry, "author") {
            Some(authors) => authors,
            None => self.editors(entry).ok_or_else(|| missing(entry, "author"))?,
        };
        let title = self.raw_field(entry, "title").ok_or_else(|| missing(entry, "title"))?;
        let edition = self
            .raw_field(entry, "edition")
            .filter(|e| !e.is_empty())
            .map(|e| Text::plain(format!("{} edition", change_case(&e, CaseMode::Lower))));
        let mut blocks = vec![
            sentence([author_or_editor]),
            sentence([emph(title_case(&title))]),
            sentence(self.volume_and_series(entry)),
            sentence([
                self.required(entry, "publisher")?,
                self.field(entry, "address").unwrap_or_default(),
                edition.unwrap_or_default(),
                self.date(entry)?,
            ]),
            self.note(entry),
        ];
        blocks.extend(self.web_refs(entry));
        Ok(blocks)
    }

    fn in_collection(&self, entry: &Entry) -> Result<Vec<Text>> {
        let booktitle = self
            .raw_field(entry, "booktitle")
            .ok_or_else(|| missing(entry, "booktitle"))?;
        let source = Text::join(
            [
                self.editors(entry).unwrap_or_default(),
                emph(title_case(&booktitle)),
                self.volume_and_series(entry).unwrap_or_default(),
                self.pages(entry)
                    .map(|pages| words([Text::plain("pages"), pages]))
                    .unwrap_or_default(),
            ],
            &Text::plain(", "),
        );
        let mut blocks = vec![
            sentence([self.required_names(entry, "author")?]),
            self.title(entry, "title")?,
            words([Text::plain("In"), source]).add_period(),
            sentence([
                self.field(entry, "organization").unwrap_or_default(),
                self.field(entry, "publisher").unwrap_or_default(),
                self.field(entry, "address").unwrap_or_default(),
                self.date(entry)?,
            ]),
            self.note(entry),
        ];
        blocks.extend(self.web_refs(entry));
        Ok(blocks)
    }

    fn misc(&self, entry: &Entry) -> Vec<Text> {
        let title = self
            .raw_field(entry, "title")
            .map(|title| sentence([title_case(&title)]))
            .unwrap_or_default();
        let date = self.date(entry).unwrap_or_default();
        let mut blocks = vec![
            sentence(self.names(entry, "author")),
            title,
            sentence([self.field(entry, "howpublished").unwrap_or_default(), date]),
            self.note(entry),
        ];
        blocks.extend(self.web_refs(entry));
        blocks
    }
}

fn missing(entry: &Entry, field: &str) -> ProcessorError {
    ProcessorError::FieldIsMissing {
        field: field.to_string(),
        key: entry.key.clone(),
    }
}
