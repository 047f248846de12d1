//! bibtex_aux - a LaTeX `.aux` file reader
//!
//! Extracts the four commands BibTeX cares about from the auxiliary file
//! LaTeX writes: `\citation{...}`, `\bibdata{...}`, `\bibstyle{...}` and
//! `\@input{...}` (which pulls in the `.aux` file of an `\include`d
//! chapter). Everything else in the file is ignored.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use winnow::combinator::{alt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::rest;

/// The `.aux` commands understood by BibTeX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxCommandKind {
    Citation,
    Bibdata,
    Bibstyle,
    Input,
}

/// One recognised command and its raw argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxCommand<'a> {
    pub kind: AuxCommandKind,
    pub argument: &'a str,
}

fn parse_kind(input: &mut &str) -> Result<AuxCommandKind, ErrMode<ContextError>> {
    preceded(
        '\\',
        alt((
            "citation".value(AuxCommandKind::Citation),
            "bibdata".value(AuxCommandKind::Bibdata),
            "bibstyle".value(AuxCommandKind::Bibstyle),
            "@input".value(AuxCommandKind::Input),
        )),
    )
    .parse_next(input)
}

/// Parse a command at the start of `input`. The argument runs up to the
/// last `}` of the input, so nested groups are kept intact.
pub fn parse_command<'a>(input: &mut &'a str) -> Result<AuxCommand<'a>, ErrMode<ContextError>> {
    let kind = parse_kind.parse_next(input)?;
    let _ = '{'.parse_next(input)?;
    let body: &'a str = rest.parse_next(input)?;
    let Some(end) = body.rfind('}') else {
        return Err(ErrMode::Backtrack(ContextError::default()));
    };
    Ok(AuxCommand {
        kind,
        argument: &body[..end],
    })
}

/// Recognise a command on a single line (without its line terminator).
pub fn parse_line(line: &str) -> Option<AuxCommand<'_>> {
    let mut input = line.trim_end_matches(['\r', '\n']);
    parse_command(&mut input).ok()
}

/// A problem in an `.aux` file, located by file and line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{message}", location(.line))]
pub struct AuxDataError {
    pub message: String,
    pub filename: PathBuf,
    /// 1-based line number; `None` for problems with the file as a whole.
    pub line: Option<usize>,
    /// The offending line, stripped.
    pub context: Option<String>,
}

fn location(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!("in line {n}: "),
        None => String::new(),
    }
}

impl AuxDataError {
    /// The offending line underlined with carets.
    pub fn marked_context(&self) -> Option<String> {
        let line = self.context.as_deref().filter(|l| !l.is_empty())?;
        Some(format!("{line}\n{}", "^".repeat(line.chars().count())))
    }

    /// `file: message` followed by the marked context.
    pub fn report(&self) -> String {
        let mut out = format!("{}: {self}", self.filename.display());
        if let Some(context) = self.marked_context() {
            out.push('\n');
            out.push_str(&context);
        }
        out
    }
}

#[derive(Debug, Error)]
pub enum AuxError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Missing `\bibdata` or `\bibstyle`.
    #[error("{}: {}", .0.filename.display(), .0)]
    Data(#[from] AuxDataError),
}

/// Everything BibTeX needs from an `.aux` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxData {
    /// Cited keys in citation order, duplicates included.
    pub citations: Vec<String>,
    /// The `\bibstyle` argument.
    pub style: String,
    /// The `\bibdata` database names, without the `.bib` extension.
    pub data: Vec<String>,
    /// Recoverable problems: case mismatches between cite keys and
    /// repeated `\bibstyle`/`\bibdata` commands. Always empty after a
    /// strict parse.
    pub warnings: Vec<AuxDataError>,
}

impl fmt::Display for AuxData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "style {}, data {}, {} citation(s)",
            self.style,
            self.data.join(","),
            self.citations.len()
        )
    }
}

/// Accumulates commands across the main file and its `\@input`s.
#[derive(Debug, Default)]
struct AuxReader {
    citations: Vec<String>,
    canonical_keys: HashMap<String, String>,
    style: Option<String>,
    data: Option<Vec<String>>,
    warnings: Vec<AuxDataError>,
    /// Files currently being read, innermost last.
    open_files: Vec<PathBuf>,
    /// Fail on the first recoverable problem instead of collecting it.
    strict: bool,
}

impl AuxReader {
    fn new(strict: bool) -> Self {
        AuxReader {
            strict,
            ..AuxReader::default()
        }
    }

    fn problem(&mut self, error: AuxDataError) -> Result<(), AuxError> {
        if self.strict {
            return Err(error.into());
        }
        self.warnings.push(error);
        Ok(())
    }

    fn read_file(&mut self, path: &Path) -> Result<(), AuxError> {
        if self.open_files.iter().any(|open| open == path) {
            let filename = self.open_files.last().cloned().unwrap_or_default();
            return self.problem(AuxDataError {
                message: format!(r"recursive \@input of {}", path.display()),
                filename,
                line: None,
                context: None,
            });
        }
        let bytes = std::fs::read(path).map_err(|source| AuxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = decode(bytes);
        tracing::debug!(path = %path.display(), "reading aux file");
        self.open_files.push(path.to_path_buf());
        let result = self.read_text(&text, path);
        self.open_files.pop();
        result
    }

    fn read_text(&mut self, text: &str, path: &Path) -> Result<(), AuxError> {
        for (index, line) in text.lines().enumerate() {
            let Some(command) = parse_line(line) else {
                continue;
            };
            let error = |message: String| AuxDataError {
                message,
                filename: path.to_path_buf(),
                line: Some(index + 1),
                context: Some(line.trim().to_string()),
            };
            match command.kind {
                AuxCommandKind::Citation => {
                    for key in command.argument.split(',').filter(|k| !k.is_empty()) {
                        let folded = key.to_lowercase();
                        if let Some(existing) = self.canonical_keys.get(&folded) {
                            if existing != key {
                                let message = format!(
                                    "case mismatch error between cite keys {key} and {existing}"
                                );
                                self.problem(error(message))?;
                            }
                        }
                        self.citations.push(key.to_string());
                        self.canonical_keys.insert(folded, key.to_string());
                    }
                }
                AuxCommandKind::Bibstyle => {
                    if self.style.is_some() {
                        self.problem(error(r"illegal, another \bibstyle command".to_string()))?;
                    } else {
                        self.style = Some(command.argument.to_string());
                    }
                }
                AuxCommandKind::Bibdata => {
                    if self.data.is_some() {
                        self.problem(error(r"illegal, another \bibdata command".to_string()))?;
                    } else {
                        self.data = Some(command.argument.split(',').map(str::to_string).collect());
                    }
                }
                AuxCommandKind::Input => {
                    let included = Path::new(command.argument);
                    let included = match path.parent() {
                        Some(dir) if included.is_relative() => dir.join(included),
                        _ => included.to_path_buf(),
                    };
                    self.read_file(&included)?;
                }
            }
        }
        Ok(())
    }

    fn finish(self, path: &Path) -> Result<AuxData, AuxError> {
        let missing = |what: &str| AuxDataError {
            message: format!(r"found no \{what} command"),
            filename: path.to_path_buf(),
            line: None,
            context: None,
        };
        let data = self.data.ok_or_else(|| missing("bibdata"))?;
        let style = self.style.ok_or_else(|| missing("bibstyle"))?;
        Ok(AuxData {
            citations: self.citations,
            style,
            data,
            warnings: self.warnings,
        })
    }
}

/// UTF-8, falling back to Latin-1 for files written by 8-bit TeX engines.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| char::from(b)).collect(),
    }
}

/// Read an `.aux` file and the files it `\@input`s. Relative `\@input`
/// paths are resolved against the directory of the including file.
///
/// A missing `\bibdata` or `\bibstyle` is an error; other problems are
/// collected in [`AuxData::warnings`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<AuxData, AuxError> {
    read_file_with(path.as_ref(), false)
}

/// [`parse_file`], but every recoverable problem is an [`AuxError::Data`].
pub fn parse_file_strict(path: impl AsRef<Path>) -> Result<AuxData, AuxError> {
    read_file_with(path.as_ref(), true)
}

/// Parse `.aux` text that was already loaded. `path` names the source for
/// diagnostics and anchors relative `\@input` paths.
pub fn parse_str(text: &str, path: impl AsRef<Path>) -> Result<AuxData, AuxError> {
    read_str_with(text, path.as_ref(), false)
}

/// [`parse_str`], but every recoverable problem is an [`AuxError::Data`].
pub fn parse_str_strict(text: &str, path: impl AsRef<Path>) -> Result<AuxData, AuxError> {
    read_str_with(text, path.as_ref(), true)
}

fn read_file_with(path: &Path, strict: bool) -> Result<AuxData, AuxError> {
    let mut reader = AuxReader::new(strict);
    reader.read_file(path)?;
    reader.finish(path)
}

fn read_str_with(text: &str, path: &Path, strict: bool) -> Result<AuxData, AuxError> {
    let mut reader = AuxReader::new(strict);
    reader.open_files.push(path.to_path_buf());
    reader.read_text(text, path)?;
    reader.finish(path)
}
