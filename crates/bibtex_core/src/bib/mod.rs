/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Bibliography database formats: `.bib` source (read and write) and
//! BibYAML.

mod parser;
mod writer;
pub mod yaml;

pub use parser::{parse_bib_files, parse_bib_str, BibParser};
pub use writer::{quote, write_bib};
pub use yaml::{parse_yaml, write_yaml};
