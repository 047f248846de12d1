/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The `format.name$` name-format language.
//!
//! A format string such as `{vv~}{ll}{, jj}{, f.}` is literal text with
//! brace groups. Each group names one name part (`f`, `v`, `l` or `j`,
//! doubled for the full form, single for initials) surrounded by text
//! that is only output when the part is not empty:
//!
//! ```text
//! {  , ff {delimiter} ~ }
//!    |  |      |      |
//!    |  |      |      post text ("~" or "~~" is a tie)
//!    |  |      custom word delimiter
//!    |  format letters
//!    pre text
//! ```

use bibtex_core::scanner::{Pattern, Scanner};
use bibtex_core::strings::{bibtex_abbreviate, bibtex_len};
use bibtex_core::{Person, Result, SyntaxError, SyntaxErrorKind};

/// Words shorter than this are tied to their neighbour.
const ENOUGH_CHARS: usize = 3;

/// `tie` if `word` is short, `space` otherwise.
pub fn tie_or_space<'a>(word: &str, tie: &'a str, space: &'a str) -> &'a str {
    if bibtex_len(word) < ENOUGH_CHARS {
        tie
    } else {
        space
    }
}

/// Join words the way BibTeX does: a tie after a short first word and
/// before the last word, spaces elsewhere.
pub fn join(words: &[String], tie: &str, space: &str) -> String {
    match words {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a}{tie}{b}"),
        [first, middle @ .., last] => format!(
            "{first}{}{}{tie}{last}",
            tie_or_space(first, tie, space),
            middle.join(space)
        ),
    }
}

/// The trailing tie of a name part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tie {
    /// `~`: a tie after short output, a space otherwise.
    Discretionary,
    /// `~~`: always a tie.
    Forced,
}

/// Which part of a person's name a format group selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartSelector {
    /// First and middle names.
    First,
    /// The "von" part.
    Von,
    Last,
    /// The "Jr" part.
    Jr,
}

impl PartSelector {
    fn from_letter(c: char) -> Option<Self> {
        match c {
            'f' => Some(PartSelector::First),
            'v' => Some(PartSelector::Von),
            'l' => Some(PartSelector::Last),
            'j' => Some(PartSelector::Jr),
            _ => None,
        }
    }

    fn words(self, person: &Person) -> Vec<String> {
        match self {
            PartSelector::First => person.bibtex_first(),
            PartSelector::Von => person.prelast.clone(),
            PartSelector::Last => person.last.clone(),
            PartSelector::Jr => person.lineage.clone(),
        }
    }
}

/// One brace group of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePart {
    pub pre_text: String,
    pub selector: Option<PartSelector>,
    pub abbreviate: bool,
    pub delimiter: Option<String>,
    pub post_text: String,
    pub tie: Option<Tie>,
}

impl NamePart {
    fn new(
        pre_text: String,
        format: Option<(PartSelector, bool)>,
        delimiter: Option<String>,
        post_text: String,
    ) -> Self {
        let (mut pre_text, mut post_text) = (pre_text, post_text);
        if format.is_none() && !pre_text.is_empty() && post_text.is_empty() {
            std::mem::swap(&mut pre_text, &mut post_text);
        }
        let tie = if post_text.ends_with("~~") {
            Some(Tie::Forced)
        } else if post_text.ends_with('~') {
            Some(Tie::Discretionary)
        } else {
            None
        };
        let post_text = post_text.trim_end_matches('~').to_string();
        let (selector, abbreviate) = match format {
            Some((selector, abbreviate)) => (Some(selector), abbreviate),
            None => (None, false),
        };
        Self {
            pre_text,
            selector,
            abbreviate,
            delimiter,
            post_text,
            tie,
        }
    }

    pub fn format(&self, person: &Person) -> String {
        let mut words = match self.selector {
            Some(selector) => {
                let words = selector.words(person);
                if words.is_empty() {
                    return String::new();
                }
                words
            }
            None => Vec::new(),
        };
        if self.abbreviate {
            words = words
                .iter()
                .map(|word| bibtex_abbreviate(word, self.delimiter.as_deref()))
                .collect();
        }
        let names = match (&self.delimiter, self.abbreviate) {
            (Some(delimiter), _) => words.join(delimiter),
            (None, true) => join(&words, ".~", ". "),
            (None, false) => join(&words, "~", " "),
        };
        let formatted = format!("{}{names}{}", self.pre_text, self.post_text);
        let tie = match self.tie {
            Some(Tie::Discretionary) => tie_or_space(&formatted, "~", " "),
            Some(Tie::Forced) => "~",
            None => "",
        };
        formatted + tie
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatElement {
    Text(String),
    Part(NamePart),
}

/// A parsed name-format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFormat {
    pub elements: Vec<FormatElement>,
}

impl NameFormat {
    pub fn parse(format: &str) -> Result<Self> {
        Ok(FormatParser::new(format).parse()?)
    }

    pub fn format(&self, person: &Person) -> String {
        self.elements
            .iter()
            .map(|element| match element {
                FormatElement::Text(text) => text.clone(),
                FormatElement::Part(part) => part.format(person),
            })
            .collect()
    }
}

/// Format the name string `name` according to `format`.
pub fn format_name(name: &str, format: &str) -> Result<String> {
    let person = Person::parse(name)?;
    Ok(NameFormat::parse(format)?.format(&person))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok {
    LBrace,
    RBrace,
    Text,
    NonLetters,
    FormatChars,
}

struct FormatParser<'t> {
    text: &'t str,
    scanner: Scanner<'t>,
    lbrace: Pattern<Tok>,
    rbrace: Pattern<Tok>,
    plain: Pattern<Tok>,
    non_letters: Pattern<Tok>,
    format_chars: Pattern<Tok>,
}

impl<'t> FormatParser<'t> {
    fn new(text: &'t str) -> Self {
        let mut scanner = Scanner::new(text);
        scanner.skip_whitespace = false;
        Self {
            text,
            scanner,
            lbrace: Pattern::literal(Tok::LBrace, "{"),
            rbrace: Pattern::literal(Tok::RBrace, "}"),
            plain: Pattern::new(Tok::Text, r"[^{}]+", "text"),
            non_letters: Pattern::new(Tok::NonLetters, r"[^{}\w]|\d+", "non-letter characters"),
            format_chars: Pattern::new(Tok::FormatChars, r"[^\W\d_]+", "format chars"),
        }
    }

    fn unbalanced(&self) -> SyntaxError {
        self.scanner.error(
            SyntaxErrorKind::UnbalancedBraces,
            format!("name format string \"{}\" has unbalanced braces", self.text),
        )
    }

    fn parse(mut self) -> std::result::Result<NameFormat, SyntaxError> {
        let mut elements = Vec::new();
        while let Some(token) =
            self.scanner
                .required_or_eof(&[&self.plain, &self.lbrace, &self.rbrace], None)?
        {
            match token.kind {
                Tok::Text => elements.push(FormatElement::Text(token.value.to_string())),
                Tok::LBrace => elements.push(FormatElement::Part(self.parse_name_part()?)),
                _ => return Err(self.unbalanced()),
            }
        }
        Ok(NameFormat { elements })
    }

    /// Text up to the matching `}`, nested groups kept with their braces.
    fn parse_braced_string(&mut self) -> std::result::Result<String, SyntaxError> {
        let mut out = String::new();
        loop {
            let token = self
                .scanner
                .required(&[&self.plain, &self.rbrace, &self.lbrace], None)
                .map_err(|_| self.unbalanced())?;
            match token.kind {
                Tok::RBrace => return Ok(out),
                Tok::LBrace => {
                    let inner = self.parse_braced_string()?;
                    out.push('{');
                    out.push_str(&inner);
                    out.push('}');
                }
                _ => out.push_str(token.value),
            }
        }
    }

    fn parse_name_part(&mut self) -> std::result::Result<NamePart, SyntaxError> {
        let mut pre_text = String::new();
        let mut post_text = String::new();
        let mut format = None;
        let mut delimiter = None;
        loop {
            let token = self
                .scanner
                .required(
                    &[&self.lbrace, &self.non_letters, &self.format_chars, &self.rbrace],
                    None,
                )
                .map_err(|_| self.unbalanced())?;
            let verbatim = if format.is_some() {
                &mut post_text
            } else {
                &mut pre_text
            };
            match token.kind {
                Tok::LBrace => {
                    let inner = self.parse_braced_string()?;
                    verbatim.push('{');
                    verbatim.push_str(&inner);
                    verbatim.push('}');
                }
                Tok::NonLetters => verbatim.push_str(token.value),
                Tok::FormatChars => {
                    format = Some(self.check_format_chars(token.value, format.is_some())?);
                    if self.scanner.optional(&[&self.lbrace]).ok().flatten().is_some() {
                        delimiter = Some(self.parse_braced_string()?);
                    }
                }
                _ => return Ok(NamePart::new(pre_text, format, delimiter, post_text)),
            }
        }
    }

    fn check_format_chars(
        &self,
        value: &str,
        seen: bool,
    ) -> std::result::Result<(PartSelector, bool), SyntaxError> {
        let lower = value.to_lowercase();
        let chars: Vec<char> = lower.chars().collect();
        let selector = match chars.as_slice() {
            [c] | [c, _] if !seen && chars[0] == chars[chars.len() - 1] => {
                PartSelector::from_letter(*c)
            }
            _ => None,
        };
        match selector {
            Some(selector) => Ok((selector, chars.len() == 1)),
            None => Err(self.scanner.error(
                SyntaxErrorKind::Syntax,
                format!(
                    "name format string \"{}\" has illegal brace-level-1 letters: {value}",
                    self.text
                ),
            )),
        }
    }
}
