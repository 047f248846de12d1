/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use bibtex_core::{parse_bib_str, BibliographyData, Diagnostics, ErrorPolicy};

/// A small database exercising macros, crossrefs and name forms.
pub const SAMPLE_BIB: &str = r#"
This text outside of entries is ignored.

@string{ tugboat = "TUGboat" }

@preamble{ "\newcommand{\noopsort}[1]{} " }

@article{Knuth:1984,
  author  = {Donald E. Knuth},
  title   = {Literate Programming},
  journal = {The Computer Journal},
  year    = 1984,
  month   = may,
  volume  = {27},
  pages   = {97--111}
}

@InCollection{ vallee,
  author    = "Charles Louis Xavier Joseph de la Vallee Poussin and Jr, Sammy Davis",
  title     = "A strong form of the prime number theorem",
  crossref  = "proceedings19",
  pages     = "1--10",
}

@Proceedings{proceedings19,
  editor    = {Ludwig van Beethoven},
  title     = {Proceedings of the Nineteenth Century},
  booktitle = {Proceedings of the Nineteenth Century},
  publisher = tugboat,
  year      = {1899},
}
"#;

pub fn sample() -> BibliographyData {
    parse(SAMPLE_BIB)
}

/// Parse leniently; panics if anything was reported.
pub fn parse(text: &str) -> BibliographyData {
    let mut diagnostics = Diagnostics::new(ErrorPolicy::Lenient);
    let data = parse_bib_str(text, &mut diagnostics).expect("lenient parse");
    assert!(
        !diagnostics.has_warnings(),
        "unexpected warnings: {:?}",
        diagnostics.warnings()
    );
    data
}
