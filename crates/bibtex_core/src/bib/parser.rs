/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! `.bib` database parser.
//!
//! The input is a sequence of `@command{...}` (or `@command(...)`) blocks;
//! anything between blocks is ignored. Besides entries, `@string` defines
//! macros, `@preamble` collects raw TeX and `@comment` is skipped.
//!
//! Syntax errors are recoverable: the offending command is reported
//! through [`Diagnostics`] and parsing resumes at the next `@`.

use std::path::Path;

use crate::caseless::{CaseInsensitiveMap, CaseInsensitiveSet};
use crate::config::Config;
use crate::database::{BibliographyData, Entry, Person};
use crate::encoding::Encoding;
use crate::error::{Diagnostics, Result, SyntaxError, SyntaxErrorKind};
use crate::scanner::{Pattern, Scanner, Token};
use crate::strings::{normalize_whitespace, split_name_list};

const MONTH_NAMES: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Characters allowed in command, field and macro names (plus digits after
/// the first character).
const NAME_RE: &str = r"[a-zA-Z@!$&*+\-./:;<>?\[\\\]^_`|~\x7f][a-zA-Z0-9@!$&*+\-./:;<>?\[\\\]^_`|~\x7f]*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok {
    At,
    Name,
    Key,
    Number,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Quote,
    Comma,
    Equals,
    Hash,
}

#[derive(Debug, Clone)]
struct Patterns {
    at: Pattern<Tok>,
    name: Pattern<Tok>,
    key_paren: Pattern<Tok>,
    key_brace: Pattern<Tok>,
    number: Pattern<Tok>,
    lbrace: Pattern<Tok>,
    rbrace: Pattern<Tok>,
    lparen: Pattern<Tok>,
    rparen: Pattern<Tok>,
    quote: Pattern<Tok>,
    comma: Pattern<Tok>,
    equals: Pattern<Tok>,
    hash: Pattern<Tok>,
}

impl Patterns {
    fn new() -> Self {
        Self {
            at: Pattern::literal(Tok::At, "@"),
            name: Pattern::new(Tok::Name, NAME_RE, "a valid name"),
            key_paren: Pattern::new(Tok::Key, r"[^\s,]+", "entry key"),
            key_brace: Pattern::new(Tok::Key, r"[^\s,}]+", "entry key"),
            number: Pattern::new(Tok::Number, r"[0-9]+", "a number"),
            lbrace: Pattern::literal(Tok::LBrace, "{"),
            rbrace: Pattern::literal(Tok::RBrace, "}"),
            lparen: Pattern::literal(Tok::LParen, "("),
            rparen: Pattern::literal(Tok::RParen, ")"),
            quote: Pattern::literal(Tok::Quote, "\""),
            comma: Pattern::literal(Tok::Comma, ","),
            equals: Pattern::literal(Tok::Equals, "="),
            hash: Pattern::literal(Tok::Hash, "#"),
        }
    }
}

/// A parsed top-level command.
enum Command<'t> {
    Entry {
        entry_type: &'t str,
        key: Option<&'t str>,
        fields: Vec<(&'t str, String)>,
    },
    Preamble(String),
    /// `@string`, `@comment`, or an entry that is not wanted.
    Skipped,
}

/// Reusable `.bib` parser. Macros defined by `@string` persist across
/// [`BibParser::parse_str`] calls, so several files can share them.
#[derive(Debug, Clone)]
pub struct BibParser {
    patterns: Patterns,
    macros: CaseInsensitiveMap<String>,
    person_fields: CaseInsensitiveSet,
    keyless_entries: bool,
}

impl Default for BibParser {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl BibParser {
    pub fn new(config: &Config) -> Self {
        Self {
            patterns: Patterns::new(),
            macros: MONTH_NAMES.iter().map(|&(k, v)| (k, v.to_string())).collect(),
            person_fields: config.person_fields.iter().cloned().collect(),
            keyless_entries: config.keyless_entries,
        }
    }

    /// Define (or overwrite) a macro.
    pub fn define_macro(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.macros.insert(name, value.into());
    }

    pub fn macro_value(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(String::as_str)
    }

    /// Replace the set of fields parsed into persons.
    pub fn set_person_fields<S: Into<String>>(&mut self, fields: impl IntoIterator<Item = S>) {
        self.person_fields = fields.into_iter().collect();
    }

    /// Parse `.bib` source text into `data`.
    pub fn parse_str(
        &mut self,
        text: &str,
        filename: Option<&str>,
        data: &mut BibliographyData,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let mut scanner = Scanner::new(text);
        if let Some(filename) = filename {
            scanner = scanner.with_filename(filename);
        }
        let mut reader = Reader {
            scanner,
            p: &self.patterns,
            macros: &mut self.macros,
            keyless_entries: self.keyless_entries,
            pending_errors: Vec::new(),
        };
        let mut unnamed = 1;
        while let Some(command) = reader.next_command(data) {
            for error in std::mem::take(&mut reader.pending_errors) {
                diagnostics.report(error)?;
            }
            match command {
                Ok(Command::Entry {
                    entry_type,
                    key,
                    fields,
                }) => {
                    let key = match key {
                        Some(key) => key.to_string(),
                        None => {
                            let key = format!("unnamed-{unnamed}");
                            unnamed += 1;
                            key
                        }
                    };
                    process_entry(&self.person_fields, entry_type, key, fields, data, diagnostics)?;
                }
                Ok(Command::Preamble(value)) => data.add_to_preamble(normalize_whitespace(&value)),
                Ok(Command::Skipped) => {}
                Err(error) => diagnostics.report(error)?,
            }
        }
        Ok(())
    }

    /// Read, decode and parse a `.bib` file.
    pub fn parse_file(
        &mut self,
        path: &Path,
        encoding: Encoding,
        data: &mut BibliographyData,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        tracing::debug!(path = %path.display(), "reading bibliography");
        let text = encoding.read_file(path)?;
        self.parse_str(&text, Some(&path.display().to_string()), data, diagnostics)
    }
}

fn process_entry(
    person_fields: &CaseInsensitiveSet,
    entry_type: &str,
    key: String,
    fields: Vec<(&str, String)>,
    data: &mut BibliographyData,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let mut entry = Entry::new(entry_type);
    for (name, value) in fields {
        let value = normalize_whitespace(&value);
        if person_fields.contains(name) {
            for person in split_name_list(&value) {
                match Person::parse(&person) {
                    Ok(person) => entry.add_person(person, name),
                    Err(error) => diagnostics.report(error)?,
                }
            }
        } else {
            entry.fields.insert(name, value);
        }
    }
    if let Err(error) = data.add_entry(key, entry) {
        diagnostics.report(error)?;
    }
    Ok(())
}

/// Parse `.bib` text with default settings, accepting every entry.
pub fn parse_bib_str(text: &str, diagnostics: &mut Diagnostics) -> Result<BibliographyData> {
    let mut data = BibliographyData::new();
    BibParser::default().parse_str(text, None, &mut data, diagnostics)?;
    Ok(data)
}

/// Parse several `.bib` files into one database. With `wanted` set, only
/// those citation keys (and their crossref targets) are kept.
pub fn parse_bib_files<P: AsRef<Path>>(
    paths: &[P],
    wanted: Option<&[String]>,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<BibliographyData> {
    let mut data = match wanted {
        Some(keys) => BibliographyData::with_wanted_entries(keys.iter().cloned(), config.min_crossrefs),
        None => BibliographyData::new(),
    };
    data.min_crossrefs = config.min_crossrefs;
    let mut parser = BibParser::new(config);
    for path in paths {
        parser.parse_file(path.as_ref(), config.bib_encoding, &mut data, diagnostics)?;
    }
    Ok(data)
}

struct Reader<'t, 'p> {
    scanner: Scanner<'t>,
    p: &'p Patterns,
    macros: &'p mut CaseInsensitiveMap<String>,
    keyless_entries: bool,
    /// Recoverable errors raised inside the current command.
    pending_errors: Vec<SyntaxError>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Brace,
    Paren,
}

impl<'t> Reader<'t, '_> {
    fn next_command(
        &mut self,
        data: &BibliographyData,
    ) -> Option<std::result::Result<Command<'t>, SyntaxError>> {
        self.scanner.skip_to(&[&self.p.at])?;
        let command_start = self.scanner.pos() - 1;
        self.scanner.set_context_start(Some(command_start));
        Some(self.parse_command(data))
    }

    fn parse_command(&mut self, data: &BibliographyData) -> std::result::Result<Command<'t>, SyntaxError> {
        let p = self.p;
        let command = self.scanner.required(&[&p.name], None)?.value;
        let open = self
            .scanner
            .required(&[&p.lparen, &p.lbrace], None)?;
        let delimiter = if open.kind == Tok::LBrace {
            Delimiter::Brace
        } else {
            Delimiter::Paren
        };
        let close = match delimiter {
            Delimiter::Brace => &p.rbrace,
            Delimiter::Paren => &p.rparen,
        };

        let result = match command.to_lowercase().as_str() {
            // the body of a comment is not parsed; scanning resumes at the next `@`
            "comment" => return Ok(Command::Skipped),
            "string" => {
                let name = self.scanner.required(&[&p.name], None)?.value;
                self.scanner.required(&[&p.equals], None)?;
                let value = self.parse_value(true)?;
                self.macros.insert(name, value);
                Command::Skipped
            }
            "preamble" => Command::Preamble(self.parse_value(true)?),
            _ => {
                let key = if self.keyless_entries {
                    None
                } else {
                    let key_pattern = match delimiter {
                        Delimiter::Brace => &p.key_brace,
                        Delimiter::Paren => &p.key_paren,
                    };
                    Some(self.scanner.required(&[key_pattern], None)?.value)
                };
                if let Some(key) = key {
                    if !data.want_entry(key) {
                        self.skip_body(delimiter);
                        return Ok(Command::Skipped);
                    }
                }
                let fields = self.parse_fields()?;
                Command::Entry {
                    entry_type: command,
                    key,
                    fields,
                }
            }
        };
        self.scanner.required(&[close], None)?;
        Ok(result)
    }

    fn parse_fields(&mut self) -> std::result::Result<Vec<(&'t str, String)>, SyntaxError> {
        let mut fields = Vec::new();
        loop {
            if let Some(name) = self.scanner.optional(&[&self.p.name])? {
                self.scanner.required(&[&self.p.equals], None)?;
                let value = self.parse_value(true)?;
                fields.push((name.value, value));
            }
            if self.scanner.optional(&[&self.p.comma])?.is_none() {
                return Ok(fields);
            }
        }
    }

    /// A `#`-concatenation of quoted strings, braced strings, numbers and
    /// macro names.
    fn parse_value(&mut self, report_undefined: bool) -> std::result::Result<String, SyntaxError> {
        let mut value = String::new();
        loop {
            let token = self.scanner.required(
                &[&self.p.quote, &self.p.lbrace, &self.p.number, &self.p.name],
                Some("field value"),
            )?;
            value.push_str(&self.value_part(token, report_undefined)?);
            if self.scanner.optional(&[&self.p.hash])?.is_none() {
                return Ok(value);
            }
        }
    }

    fn value_part(
        &mut self,
        token: Token<'t, Tok>,
        report_undefined: bool,
    ) -> std::result::Result<String, SyntaxError> {
        match token.kind {
            Tok::Quote => Ok(self.scan_string(Delimiter::Paren)?.to_string()),
            Tok::LBrace => Ok(self.scan_string(Delimiter::Brace)?.to_string()),
            Tok::Number => Ok(token.value.to_string()),
            _ => match self.macros.get(token.value) {
                Some(value) => Ok(value.clone()),
                None => {
                    if report_undefined {
                        let error = self
                            .scanner
                            .error(SyntaxErrorKind::UndefinedString, token.value);
                        self.pending_errors.push(error);
                    }
                    Ok(String::new())
                }
            },
        }
    }

    /// The raw text of a string whose opening delimiter was just read.
    /// `Delimiter::Paren` stands for a double-quoted string here.
    fn scan_string(&mut self, end: Delimiter) -> std::result::Result<&'t str, SyntaxError> {
        let start = self.scanner.pos();
        let text = self.scanner.rest();
        let mut depth = 0usize;
        for (i, b) in text.bytes().enumerate() {
            match b {
                b'"' if depth == 0 && end == Delimiter::Paren => {
                    self.scanner.advance_to(start + i + 1);
                    return Ok(&text[..i]);
                }
                b'{' => depth += 1,
                b'}' if depth > 0 => depth -= 1,
                b'}' => {
                    if end == Delimiter::Brace {
                        self.scanner.advance_to(start + i + 1);
                        return Ok(&text[..i]);
                    }
                    self.scanner.advance_to(start + i + 1);
                    return Err(self
                        .scanner
                        .error(SyntaxErrorKind::UnbalancedBraces, "unbalanced braces"));
                }
                _ => {}
            }
        }
        self.scanner.advance_to(start + text.len());
        Err(self.scanner.premature_eof())
    }

    /// Skip the rest of an entry body without interpreting it.
    fn skip_body(&mut self, delimiter: Delimiter) {
        let start = self.scanner.pos();
        let text = self.scanner.rest();
        let mut depth = 0usize;
        let mut in_quotes = false;
        for (i, b) in text.bytes().enumerate() {
            match b {
                b'{' => depth += 1,
                b'}' if depth > 0 => depth -= 1,
                b'}' if delimiter == Delimiter::Brace => {
                    self.scanner.advance_to(start + i + 1);
                    return;
                }
                b'"' if depth == 0 => in_quotes = !in_quotes,
                b')' if depth == 0 && !in_quotes && delimiter == Delimiter::Paren => {
                    self.scanner.advance_to(start + i + 1);
                    return;
                }
                _ => {}
            }
        }
        self.scanner.advance_to(start + text.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorPolicy;

    fn parse(text: &str) -> (BibliographyData, Vec<String>) {
        let mut diagnostics = Diagnostics::new(ErrorPolicy::Lenient);
        let data = parse_bib_str(text, &mut diagnostics).unwrap();
        (data, diagnostics.take_warnings())
    }

    #[test]
    fn test_macros_and_concatenation() {
        let (data, warnings) = parse(
            r##"
@String{SCI = "Science"}
@String{MRief = "Rief, Matthias"}
@String{MGautel = "Gautel, Mathias"}

@Article{rief97b,
  author =       MRief #" and "# MGautel,
  title =        "Reversible Unfolding of Individual Titin
                 Immunoglobulin Domains by {AFM}",
  journal =      SCI,
  volume =       276,
  month =        jun,
  URL =          "http://www.sciencemag.org/cgi/content/abstract/276/5315/1109",
}
"##,
        );
        assert!(warnings.is_empty());
        let entry = data.get("RIEF97B").unwrap();
        assert_eq!(entry.entry_type, "article");
        assert_eq!(entry.original_type, "Article");
        assert_eq!(
            entry.field("title"),
            Some("Reversible Unfolding of Individual Titin Immunoglobulin Domains by {AFM}")
        );
        assert_eq!(entry.field("journal"), Some("Science"));
        assert_eq!(entry.field("volume"), Some("276"));
        assert_eq!(entry.field("month"), Some("June"));
        assert_eq!(entry.field("url"), entry.field("URL"));
        let authors: Vec<String> = entry.persons.get("author").unwrap().iter().map(|p| p.to_string()).collect();
        assert_eq!(authors, ["Rief, Matthias", "Gautel, Mathias"]);
    }

    #[test]
    fn test_braced_value_whitespace() {
        let (data, _) = parse("@article{k, title={Polluted\n with {DDT}.\n }}");
        assert_eq!(data.get("k").unwrap().field("title"), Some("Polluted with {DDT}."));
    }

    #[test]
    fn test_paren_entries_and_quotes_in_braces() {
        let (data, _) = parse(r#"@misc(key:1, note = {He said "hi"}, title = "a {"} b")"#);
        let entry = data.get("key:1").unwrap();
        assert_eq!(entry.field("note"), Some(r#"He said "hi""#));
        assert_eq!(entry.field("title"), Some(r#"a {"} b"#));
    }

    #[test]
    fn test_preamble() {
        let (data, _) = parse(
            r#"@preamble{"\newcommand{\noopsort}[1]{}"}
@PREAMBLE{ "\newcommand" # {\x} }"#,
        );
        assert_eq!(data.preamble(), r"\newcommand{\noopsort}[1]{}\newcommand\x");
    }

    #[test]
    fn test_comments_are_skipped() {
        let (data, _) = parse("@comment{ unbalanced { text }\n@book{b, title={B}}\nfree text");
        assert_eq!(data.entries.keys().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn test_undefined_macro_is_reported() {
        let (data, warnings) = parse("@article{k, journal = nosuch # { Letters}}");
        assert_eq!(data.get("k").unwrap().field("journal"), Some("Letters"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("undefined string in line 1: nosuch"));
    }

    #[test]
    fn test_undefined_macro_strict() {
        let mut diagnostics = Diagnostics::new(ErrorPolicy::Strict);
        assert!(parse_bib_str("@article{k, journal = nosuch}", &mut diagnostics).is_err());
    }

    #[test]
    fn test_syntax_error_recovers_at_next_entry() {
        let (data, warnings) = parse("@article{broken, title = }\n@book{good, title = {G}}");
        assert!(data.get("broken").is_none());
        assert_eq!(data.get("good").unwrap().field("title"), Some("G"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("syntax error in line 1: field value expected"));
    }

    #[test]
    fn test_missing_body_delimiter() {
        let (_, warnings) = parse("@article\n[k]");
        assert!(warnings[0].starts_with("syntax error in line 2: '(' or '{' expected"));
    }

    #[test]
    fn test_bad_name() {
        let (_, warnings) = parse("@2article{k}");
        assert!(warnings[0].starts_with("syntax error in line 1: a valid name expected"));
    }

    #[test]
    fn test_unbalanced_quoted_string() {
        let (data, warnings) = parse("@article{k, title = \"a } b\"}\n@book{ok}");
        assert!(data.get("k").is_none());
        assert!(data.get("ok").is_some());
        assert!(warnings[0].contains("unbalanced braces"));
    }

    #[test]
    fn test_repeated_key_keeps_first() {
        let (data, warnings) = parse("@book{a, title={1}}\n@book{A, title={2}}");
        assert_eq!(data.get("a").unwrap().field("title"), Some("1"));
        assert_eq!(warnings, ["repeated bibliography entry: A"]);
    }

    #[test]
    fn test_keyless_entries() {
        let config = Config {
            keyless_entries: true,
            ..Config::default()
        };
        let mut data = BibliographyData::new();
        let mut diagnostics = Diagnostics::default();
        BibParser::new(&config)
            .parse_str("@book{title={A}}\n@book{title={B}}", None, &mut data, &mut diagnostics)
            .unwrap();
        assert_eq!(data.entries.keys().collect::<Vec<_>>(), ["unnamed-1", "unnamed-2"]);
    }

    #[test]
    fn test_unwanted_entries_are_skipped_cheaply() {
        let mut data = BibliographyData::with_wanted_entries(["wanted"], 2);
        let mut diagnostics = Diagnostics::default();
        BibParser::default()
            .parse_str(
                "@book{other, title = undefinedmacro # {x}}\n@book{wanted, title={W}}",
                None,
                &mut data,
                &mut diagnostics,
            )
            .unwrap();
        assert!(!diagnostics.has_warnings());
        assert_eq!(data.entries.keys().collect::<Vec<_>>(), ["wanted"]);
    }

    #[test]
    fn test_crossref_target_becomes_wanted() {
        let mut data = BibliographyData::with_wanted_entries(["child"], 2);
        let mut diagnostics = Diagnostics::default();
        BibParser::default()
            .parse_str(
                "@inbook{child, crossref={parent}}\n@book{parent, title={P}}\n@book{other}",
                None,
                &mut data,
                &mut diagnostics,
            )
            .unwrap();
        assert_eq!(data.entries.keys().collect::<Vec<_>>(), ["child", "parent"]);
    }
}
