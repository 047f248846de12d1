/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! From an `.aux` file to a written bibliography.

use std::path::{Path, PathBuf};

use bibtex_core::config::StyleLanguage;
use bibtex_core::{parse_bib_files, BibTeXError, Config, Diagnostics};

use crate::bibliography::FormattedBibliography;
use crate::bst::BstProgram;
use crate::error::Result;
use crate::interpreter::{BibSource, Interpreter};
use crate::style;

/// A bibliography written to disk.
#[derive(Debug, Clone)]
pub struct MakeOutcome {
    /// The file that was written.
    pub output: PathBuf,
    pub bibliography: FormattedBibliography,
}

/// Append `extension` unless `name` already ends with it.
fn with_extension(dir: &Path, name: &str, extension: &str) -> PathBuf {
    let suffix = format!(".{extension}");
    if name.ends_with(&suffix) {
        dir.join(name)
    } else {
        dir.join(format!("{name}{suffix}"))
    }
}

/// Run a `.bst` program over `citations`.
pub fn run_bst(
    program: &BstProgram,
    citations: &[String],
    source: BibSource,
    config: &Config,
) -> bibtex_core::Result<FormattedBibliography> {
    Interpreter::new(config).run(program, citations, source)
}

/// Process `aux_path` the way `bibtex` does: read the citations, the style
/// and the databases named in it, format the bibliography and write it
/// beside the `.aux` file.
///
/// Style and database files are looked up in the `.aux` file's directory
/// only.
pub fn make_bibliography(aux_path: &Path, config: &Config) -> Result<MakeOutcome> {
    make_bibliography_with_style(aux_path, None, config)
}

/// [`make_bibliography`] with the `.aux` file's `\bibstyle` replaced by
/// `style` when given.
pub fn make_bibliography_with_style(
    aux_path: &Path,
    style: Option<&str>,
    config: &Config,
) -> Result<MakeOutcome> {
    let aux = if config.strict {
        bibtex_aux::parse_file_strict(aux_path)?
    } else {
        bibtex_aux::parse_file(aux_path)?
    };
    let dir = aux_path.parent().unwrap_or_else(|| Path::new("."));
    let base = aux_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bibliography".to_string());
    let bib_paths: Vec<PathBuf> = aux
        .data
        .iter()
        .map(|name| with_extension(dir, name, "bib"))
        .collect();

    let mut aux_diagnostics = Diagnostics::new(config.error_policy());
    for warning in &aux.warnings {
        aux_diagnostics.report(BibTeXError::Warning(warning.report()))?;
    }
    let mut aux_warnings = aux_diagnostics.take_warnings();

    let (mut bibliography, extension) = match config.style_language {
        StyleLanguage::Bibtex => {
            let style_name = style.unwrap_or(&aux.style);
            let style_path = with_extension(dir, style_name, "bst");
            tracing::info!(style = %style_path.display(), "running BibTeX style");
            let program = BstProgram::from_file(&style_path, config.bst_encoding)?;
            let bibliography =
                run_bst(&program, &aux.citations, BibSource::Files(bib_paths), config)?;
            (bibliography, "bbl")
        }
        StyleLanguage::Native => {
            tracing::info!(backend = %config.native.output_backend, "running native style");
            let mut diagnostics = Diagnostics::new(config.error_policy());
            let data =
                parse_bib_files(&bib_paths, Some(aux.citations.as_slice()), config, &mut diagnostics)?;
            let mut bibliography = style::format_bibliography(&data, &aux.citations, config)?;
            let mut warnings = diagnostics.take_warnings();
            warnings.append(&mut bibliography.warnings);
            bibliography.warnings = warnings;
            (bibliography, config.native.output_backend.extension())
        }
    };
    aux_warnings.append(&mut bibliography.warnings);
    bibliography.warnings = aux_warnings;

    let output = dir.join(format!("{base}.{extension}"));
    config.output_encoding.write_file(&output, &bibliography.text)?;
    tracing::info!(
        output = %output.display(),
        entries = bibliography.len(),
        "bibliography written"
    );
    Ok(MakeOutcome {
        output,
        bibliography,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_extension() {
        let dir = Path::new("/tmp/doc");
        assert_eq!(with_extension(dir, "refs", "bib"), dir.join("refs.bib"));
        assert_eq!(with_extension(dir, "refs.bib", "bib"), dir.join("refs.bib"));
        assert_eq!(with_extension(dir, "plain", "bst"), dir.join("plain.bst"));
    }
}
