/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! BibTeX Core
//!
//! The data side of the rbibtex engine: the bibliography database model,
//! the `.bib` parser and writer, BibYAML support, personal-name parsing,
//! and the brace-aware string functions that BibTeX styles are built on.
//!
//! # Example
//!
//! ```rust
//! use bibtex_core::{parse_bib_str, Diagnostics};
//!
//! let mut diagnostics = Diagnostics::default();
//! let data = parse_bib_str(
//!     "@book{knuth84, author = {Donald E. Knuth}, title = {The {TeX}book}}",
//!     &mut diagnostics,
//! )
//! .unwrap();
//! let entry = data.get("knuth84").unwrap();
//! assert_eq!(entry.field("title"), Some("The {TeX}book"));
//! assert_eq!(entry.persons.get("author").unwrap()[0].last, ["Knuth"]);
//! ```

pub mod bib;
pub mod caseless;
pub mod config;
pub mod database;
pub mod encoding;
pub mod error;
pub mod scanner;
pub mod strings;

pub use bib::{parse_bib_files, parse_bib_str, write_bib, BibParser};
pub use caseless::{CaseInsensitiveMap, CaseInsensitiveSet};
pub use config::{Config, ErrorPolicy};
pub use database::{BibliographyData, Entry, EntryValue, FieldDict, NamePart, Person};
pub use encoding::Encoding;
pub use error::{BibTeXError, DataError, Diagnostics, Error, Result, SyntaxError, SyntaxErrorKind};
