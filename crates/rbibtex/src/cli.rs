/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rbibtex", version)]
#[command(about = "BibTeX-compatible bibliography processor")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// The LaTeX .aux file to process
    pub aux: Option<PathBuf>,

    #[command(flatten)]
    pub options: Options,
}

/// Overrides for values from the configuration file.
#[derive(Args, Default)]
pub struct Options {
    /// Configuration file (default: rbibtex.toml in the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Turn recoverable errors into failures
    #[arg(long)]
    pub strict: bool,

    /// Include an entry after this many cited entries cross-reference it
    #[arg(long)]
    pub min_crossrefs: Option<usize>,

    /// Use this style instead of the one named in the .aux file
    #[arg(long)]
    pub style: Option<String>,

    /// bibtex (run a .bst file) or native
    #[arg(long)]
    pub style_language: Option<String>,

    /// Native output backend: latex, html, text or markdown
    #[arg(long)]
    pub backend: Option<String>,

    /// Native label style: number or alpha
    #[arg(long)]
    pub label_style: Option<String>,

    /// Native name style: plain or lastfirst
    #[arg(long)]
    pub name_style: Option<String>,

    /// Native sorting style: none or author_year_title
    #[arg(long)]
    pub sorting_style: Option<String>,

    /// Abbreviate first names in native styles
    #[arg(long)]
    pub abbreviate_names: bool,

    /// Encoding of all input and output files (utf-8 or latin1)
    #[arg(long)]
    pub encoding: Option<String>,

    /// Print the formatted entries as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(about = "Format a personal name with a BibTeX name format")]
    FormatName {
        /// A name list, e.g. "Donald E. Knuth and Leslie Lamport"
        name: String,

        /// A format string, e.g. "{vv~}{ll}{, jj}{, f.}"
        format: String,

        /// Which name of the list to format (1-based)
        #[arg(long, default_value_t = 1)]
        index: usize,
    },

    #[command(about = "Convert a bibliography between .bib and BibYAML")]
    Convert {
        input: PathBuf,
        output: PathBuf,
    },

    #[command(about = "Generate shell completion scripts")]
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
