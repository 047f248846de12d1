/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Error types shared by the parsers, the data model and the style
//! interpreter, plus [`Diagnostics`], which applies the strict/lenient
//! error policy to recoverable errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ErrorPolicy;

pub type Result<T> = std::result::Result<T, Error>;

/// Any failure raised by the BibTeX engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Runtime(#[from] BibTeXError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// What kind of token-level problem a [`SyntaxError`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    Syntax,
    PrematureEof,
    UndefinedString,
    UnbalancedBraces,
}

impl SyntaxErrorKind {
    fn label(self) -> &'static str {
        match self {
            SyntaxErrorKind::UndefinedString => "undefined string",
            _ => "syntax error",
        }
    }
}

/// Malformed `.bib`, `.bst`, `.aux` or name-format input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub filename: Option<String>,
    /// 1-based line of the offending token, when known.
    pub line: Option<usize>,
    /// 0-based column of the offending token within `context`.
    pub column: Option<usize>,
    /// The source line (or entry prefix) the error occurred in.
    pub context: Option<String>,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            filename: None,
            line: None,
            column: None,
            context: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// The context snippet followed by a caret line marking the column.
    pub fn marked_context(&self) -> Option<String> {
        let context = self.context.as_deref()?;
        let marker = match self.column {
            Some(0) | None => "^^".to_string(),
            Some(col) => format!("{}^^^", " ".repeat(col - 1)),
        };
        Some(format!("{context}\n{marker}"))
    }

    /// A multi-line report: file prefix, message, and the marked context.
    pub fn report(&self) -> String {
        let mut out = String::new();
        if let Some(filename) = &self.filename {
            out.push_str(filename);
            out.push_str(": ");
        }
        out.push_str(&self.to_string());
        if let Some(context) = self.marked_context() {
            out.push('\n');
            out.push_str(&context);
        }
        out
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.label())?;
        if let Some(line) = self.line {
            write!(f, " in line {line}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Inconsistent bibliography data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("repeated bibliography entry: {0}")]
    RepeatedEntry(String),
    #[error("bad cross-reference: entry \"{key}\" refers to entry \"{crossref}\" which does not exist.")]
    BadCrossref { key: String, crossref: String },
    #[error("String has unmatched braces: {0}")]
    UnmatchedBraces(String),
    #[error("Invalid name format: {0}")]
    InvalidName(String),
    #[error("{0}")]
    Other(String),
}

/// Failures (and warnings) raised while running a style program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BibTeXError {
    #[error("pop from empty stack")]
    StackUnderflow,
    #[error("can not execute undefined function {0}")]
    UndefinedFunction(String),
    #[error("can not push undefined variable {0}")]
    UndefinedVariable(String),
    #[error("variable \"{0}\" already declared")]
    AlreadyDeclared(String),
    #[error("{builtin}: expected {expected}, got {found}")]
    TypeMismatch {
        builtin: String,
        expected: &'static str,
        found: String,
    },
    #[error("can not assign to {0}")]
    NotAssignable(String),
    #[error("{0} needs an entry to be processed")]
    NoCurrentEntry(String),
    #[error("empty mode string passed to change.case$")]
    EmptyCaseMode,
    #[error("incorrect change.case$ mode: {0}")]
    BadCaseMode(String),
    #[error("{builtin}: {message}")]
    BadArgument { builtin: String, message: String },
    #[error("missing database entry for \"{0}\"")]
    MissingEntry(String),
    #[error("entry type for \"{0}\" isn't style-file defined")]
    UndefinedEntryType(String),
    #[error("{0}")]
    Warning(String),
}

/// Applies an [`ErrorPolicy`] to recoverable errors and keeps the warnings
/// that were let through.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    policy: ErrorPolicy,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Report a recoverable error. Strict mode hands it back as `Err`;
    /// lenient mode logs and records it, and the caller carries on.
    pub fn report(&mut self, error: impl Into<Error>) -> Result<()> {
        let error = error.into();
        match self.policy {
            ErrorPolicy::Strict => Err(error),
            ErrorPolicy::Lenient => {
                let message = match &error {
                    Error::Syntax(e) => e.report(),
                    other => other.to_string(),
                };
                tracing::warn!("{message}");
                self.warnings.push(message);
                Ok(())
            }
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Fold warnings collected elsewhere (e.g. by a nested parser run).
    pub fn extend(&mut self, warnings: impl IntoIterator<Item = String>) {
        self.warnings.extend(warnings);
    }
}
