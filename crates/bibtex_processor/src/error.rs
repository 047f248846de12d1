/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Errors raised while producing a bibliography.

use bibtex_aux::AuxError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessorError>;

#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Parsing, data or style-program failure from the engine.
    #[error(transparent)]
    Core(#[from] bibtex_core::Error),

    #[error(transparent)]
    Aux(#[from] AuxError),

    /// A field required by a native style template is absent.
    #[error("missing field \"{field}\" in entry \"{key}\"")]
    FieldIsMissing { field: String, key: String },
}

impl ProcessorError {
    /// A multi-line message; syntax errors carry their marked context.
    pub fn report(&self) -> String {
        match self {
            ProcessorError::Core(bibtex_core::Error::Syntax(e)) => e.report(),
            ProcessorError::Aux(AuxError::Data(e)) => e.report(),
            other => other.to_string(),
        }
    }
}

impl From<bibtex_core::SyntaxError> for ProcessorError {
    fn from(e: bibtex_core::SyntaxError) -> Self {
        ProcessorError::Core(e.into())
    }
}

impl From<bibtex_core::BibTeXError> for ProcessorError {
    fn from(e: bibtex_core::BibTeXError) -> Self {
        ProcessorError::Core(e.into())
    }
}
