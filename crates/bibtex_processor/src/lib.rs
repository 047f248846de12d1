/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! BibTeX Processor
//!
//! Turns citations and a bibliography database into a formatted reference
//! list. Two engines are available:
//!
//! - the `.bst` engine: a parser for BibTeX's style language and the stack
//!   machine that runs it, producing `.bbl` text byte-compatible with
//!   BibTeX 0.99;
//! - native styles: label, sorting and name styles plus an `unsrt`-like
//!   layout written in Rust, rendered to LaTeX, HTML, Markdown or plain
//!   text.
//!
//! [`make_bibliography`] drives either engine from a LaTeX `.aux` file.
//!
//! # Example
//!
//! ```rust
//! use bibtex_processor::{run_bst, BibSource, BstProgram};
//! use bibtex_core::{parse_bib_str, Config, Diagnostics};
//!
//! let data = parse_bib_str(
//!     r#"@book{knuth84, author = "Donald E. Knuth", title = "The {TeX}book"}"#,
//!     &mut Diagnostics::default(),
//! )
//! .unwrap();
//! let program = BstProgram::parse(
//!     r#"
//!     ENTRY { author title } { } { }
//!     FUNCTION { book } {
//!         "\bibitem{" cite$ * "}" * write$ newline$
//!         author #1 "{vv~}{ll}{, f.}" format.name$ " " *
//!         title "t" change.case$ * "." * write$ newline$
//!     }
//!     READ
//!     ITERATE { call.type$ }
//!     "#,
//! )
//! .unwrap();
//! let bbl = run_bst(
//!     &program,
//!     &["knuth84".to_string()],
//!     BibSource::Data(data),
//!     &Config::default(),
//! )
//! .unwrap();
//! assert_eq!(bbl.text, "\\bibitem{knuth84}\nKnuth, D. The {TeX}book.\n");
//! ```

pub mod bibliography;
pub mod bst;
pub mod driver;
pub mod error;
pub mod interpreter;
pub mod names;
pub mod render;
pub mod richtext;
pub mod style;

pub use bibliography::{FormattedBibliography, FormattedEntry};
pub use bst::{parse_bst_str, BstProgram, Command, Literal};
pub use driver::{make_bibliography, make_bibliography_with_style, run_bst, MakeOutcome};
pub use error::{ProcessorError, Result};
pub use interpreter::{BibSource, Interpreter};
pub use names::{format_name, NameFormat};
pub use richtext::{Fragment, Symbol, Tag, Text};
pub use style::{format_bibliography, NativeStyle};
