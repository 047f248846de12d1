/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Run configuration, loadable from `rbibtex.toml`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;
use crate::error::{Error, Result};

/// Name of the project-level configuration file.
pub const CONFIG_FILE_NAME: &str = "rbibtex.toml";

/// Whether recoverable errors abort the run or are downgraded to warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    Strict,
    #[default]
    Lenient,
}

/// Which engine formats the bibliography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLanguage {
    /// Run a `.bst` program through the stack machine.
    #[default]
    Bibtex,
    /// Use the built-in Rust styles.
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    #[default]
    Number,
    Alpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    #[default]
    Plain,
    Lastfirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortingStyle {
    #[default]
    None,
    AuthorYearTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputBackend {
    /// BibTeX `.bbl` markup (`thebibliography`).
    #[default]
    Latex,
    Html,
    Text,
    Markdown,
}

impl OutputBackend {
    /// Default file extension for this backend's output.
    pub fn extension(self) -> &'static str {
        match self {
            OutputBackend::Latex => "bbl",
            OutputBackend::Html => "html",
            OutputBackend::Text => "txt",
            OutputBackend::Markdown => "md",
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ty, $what:literal, { $($name:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_lowercase().replace('-', "_").as_str() {
                    $($name => Ok($variant),)+
                    other => Err(Error::Config(format!(concat!("unknown ", $what, ": {}"), other))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                $(if *self == $variant { return f.write_str($name); })+
                Ok(())
            }
        }
    };
}

impl_str_enum!(StyleLanguage, "style language", {
    "bibtex" => StyleLanguage::Bibtex,
    "native" => StyleLanguage::Native,
});
impl_str_enum!(LabelStyle, "label style", {
    "number" => LabelStyle::Number,
    "alpha" => LabelStyle::Alpha,
});
impl_str_enum!(NameStyle, "name style", {
    "plain" => NameStyle::Plain,
    "lastfirst" => NameStyle::Lastfirst,
});
impl_str_enum!(SortingStyle, "sorting style", {
    "none" => SortingStyle::None,
    "author_year_title" => SortingStyle::AuthorYearTitle,
});
impl_str_enum!(OutputBackend, "output backend", {
    "latex" => OutputBackend::Latex,
    "html" => OutputBackend::Html,
    "text" => OutputBackend::Text,
    "markdown" => OutputBackend::Markdown,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Turn recoverable errors into failures.
    #[serde(default)]
    pub strict: bool,

    /// How many citing entries pull an uncited crossref target into the
    /// bibliography.
    #[serde(default = "default_min_crossrefs")]
    pub min_crossrefs: usize,

    /// Accept `.bib` entries without a key (they become `unnamed-N`).
    #[serde(default)]
    pub keyless_entries: bool,

    /// Fields parsed into lists of persons.
    #[serde(default = "default_person_fields")]
    pub person_fields: Vec<String>,

    #[serde(default)]
    pub bib_encoding: Encoding,

    #[serde(default)]
    pub bst_encoding: Encoding,

    #[serde(default)]
    pub output_encoding: Encoding,

    #[serde(default)]
    pub style_language: StyleLanguage,

    #[serde(default)]
    pub native: NativeStyleConfig,
}

/// Options for the built-in (non-`.bst`) styles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeStyleConfig {
    #[serde(default)]
    pub label_style: LabelStyle,

    #[serde(default)]
    pub name_style: NameStyle,

    #[serde(default)]
    pub sorting_style: SortingStyle,

    #[serde(default)]
    pub abbreviate_names: bool,

    #[serde(default)]
    pub output_backend: OutputBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            min_crossrefs: default_min_crossrefs(),
            keyless_entries: false,
            person_fields: default_person_fields(),
            bib_encoding: Encoding::default(),
            bst_encoding: Encoding::default(),
            output_encoding: Encoding::default(),
            style_language: StyleLanguage::default(),
            native: NativeStyleConfig::default(),
        }
    }
}

fn default_min_crossrefs() -> usize {
    2
}

fn default_person_fields() -> Vec<String> {
    vec!["author".to_string(), "editor".to_string()]
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Look for `rbibtex.toml` in the current directory.
    pub fn load_from_project() -> Result<Option<Self>> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            return Ok(Some(Self::load(path)?));
        }
        Ok(None)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        if self.strict {
            ErrorPolicy::Strict
        } else {
            ErrorPolicy::Lenient
        }
    }
}
