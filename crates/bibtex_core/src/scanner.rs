/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! A small regex-driven tokenizer shared by the `.bib`, `.bst` and
//! name-format parsers.
//!
//! Each grammar declares its token classes as [`Pattern`]s tagged with a
//! caller-defined kind (usually a small `Copy` enum) and asks the
//! [`Scanner`] for the next token among a given set. The scanner never
//! backtracks more than one token and tracks line numbers so that errors
//! can point at the offending source line.

use regex::Regex;

use crate::error::{SyntaxError, SyntaxErrorKind};

/// A token class: a regular expression plus a human readable description
/// used in "X or Y expected" messages.
#[derive(Debug, Clone)]
pub struct Pattern<K> {
    pub kind: K,
    description: String,
    search: Regex,
    anchored: Regex,
}

impl<K: Copy> Pattern<K> {
    /// Build a pattern from a regular expression. Patterns are fixed
    /// grammar constants, so an invalid expression is a programming error.
    pub fn new(kind: K, regex: &str, description: &str) -> Self {
        Self {
            kind,
            description: description.to_string(),
            search: Regex::new(regex).expect("invalid token pattern"),
            anchored: Regex::new(&format!(r"\A(?:{regex})")).expect("invalid token pattern"),
        }
    }

    /// A pattern matching `text` literally, described as `'text'`.
    pub fn literal(kind: K, text: &str) -> Self {
        Self::new(kind, &regex::escape(text), &format!("'{text}'"))
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A matched token, borrowing from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t, K> {
    pub kind: K,
    pub value: &'t str,
    /// Byte offset of the token in the scanned text.
    pub start: usize,
}

impl<K> Token<'_, K> {
    pub fn end(&self) -> usize {
        self.start + self.value.len()
    }
}

enum Lookahead<'t, K> {
    Token(Token<'t, K>),
    NoMatch,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Scanner<'t> {
    text: &'t str,
    pos: usize,
    line: usize,
    filename: Option<String>,
    /// Whether whitespace is skipped before each token.
    pub skip_whitespace: bool,
    /// When set, error contexts start here instead of at the line start.
    context_start: Option<usize>,
}

impl<'t> Scanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            filename: None,
            skip_whitespace: true,
            context_start: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Text not consumed yet.
    pub fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    /// Make error contexts begin at `start` (e.g. the `@` of a `.bib`
    /// command) rather than at the start of the error's line.
    pub fn set_context_start(&mut self, start: Option<usize>) {
        self.context_start = start;
    }

    /// Jump to a byte offset at or after the current position.
    pub fn advance_to(&mut self, pos: usize) {
        let pos = pos.min(self.text.len());
        if pos > self.pos {
            self.consume(pos);
        }
    }

    fn consume(&mut self, end: usize) {
        self.line += self.text[self.pos..end].matches('\n').count();
        self.pos = end;
    }

    /// Advance past the nearest match of any of `patterns`. Returns the
    /// skipped text (including the match) or `None` if nothing matches,
    /// in which case the position is unchanged.
    pub fn skip_to<K: Copy>(&mut self, patterns: &[&Pattern<K>]) -> Option<Token<'t, K>> {
        let (kind, end) = patterns
            .iter()
            .filter_map(|p| p.search.find_at(self.text, self.pos).map(|m| (p.kind, m.end())))
            .min_by_key(|&(_, end)| end)?;
        let start = self.pos;
        self.consume(end);
        Some(Token {
            kind,
            value: &self.text[start..end],
            start,
        })
    }

    pub fn eat_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        let end = self.pos + (rest.len() - trimmed.len());
        self.consume(end);
    }

    fn lookahead<K: Copy>(&mut self, patterns: &[&Pattern<K>]) -> Lookahead<'t, K> {
        if self.skip_whitespace {
            self.eat_whitespace();
        }
        if self.is_eof() {
            return Lookahead::Eof;
        }
        for pattern in patterns {
            if let Some(m) = pattern.anchored.find(self.rest()) {
                let start = self.pos;
                let end = start + m.end();
                self.consume(end);
                return Lookahead::Token(Token {
                    kind: pattern.kind,
                    value: &self.text[start..end],
                    start,
                });
            }
        }
        Lookahead::NoMatch
    }

    /// The next token if it belongs to one of `patterns`. Hitting the end
    /// of input is an error.
    pub fn optional<K: Copy>(
        &mut self,
        patterns: &[&Pattern<K>],
    ) -> Result<Option<Token<'t, K>>, SyntaxError> {
        match self.lookahead(patterns) {
            Lookahead::Token(token) => Ok(Some(token)),
            Lookahead::NoMatch => Ok(None),
            Lookahead::Eof => Err(self.premature_eof()),
        }
    }

    /// Like [`Scanner::optional`] but the end of input yields `Ok(None)`.
    pub fn optional_or_eof<K: Copy>(
        &mut self,
        patterns: &[&Pattern<K>],
    ) -> Result<Option<Token<'t, K>>, SyntaxError> {
        match self.lookahead(patterns) {
            Lookahead::Token(token) => Ok(Some(token)),
            Lookahead::NoMatch | Lookahead::Eof => Ok(None),
        }
    }

    /// The next token, which must belong to one of `patterns`.
    pub fn required<K: Copy>(
        &mut self,
        patterns: &[&Pattern<K>],
        description: Option<&str>,
    ) -> Result<Token<'t, K>, SyntaxError> {
        match self.required_or_eof(patterns, description)? {
            Some(token) => Ok(token),
            None => Err(self.premature_eof()),
        }
    }

    /// Like [`Scanner::required`] but the end of input yields `Ok(None)`.
    pub fn required_or_eof<K: Copy>(
        &mut self,
        patterns: &[&Pattern<K>],
        description: Option<&str>,
    ) -> Result<Option<Token<'t, K>>, SyntaxError> {
        match self.lookahead(patterns) {
            Lookahead::Token(token) => Ok(Some(token)),
            Lookahead::Eof => Ok(None),
            Lookahead::NoMatch => {
                let description = match description {
                    Some(d) => d.to_string(),
                    None => patterns
                        .iter()
                        .map(|p| p.description())
                        .collect::<Vec<_>>()
                        .join(" or "),
                };
                Err(self.error(SyntaxErrorKind::Syntax, format!("{description} expected")))
            }
        }
    }

    pub fn premature_eof(&self) -> SyntaxError {
        self.error(SyntaxErrorKind::PrematureEof, "premature end of file")
    }

    /// A syntax error located at the current position.
    pub fn error(&self, kind: SyntaxErrorKind, message: impl Into<String>) -> SyntaxError {
        let (context, column) = self.error_context();
        SyntaxError {
            kind,
            message: message.into(),
            filename: self.filename.clone(),
            line: Some(self.line),
            column: Some(column),
            context: Some(context),
        }
    }

    fn error_context(&self) -> (String, usize) {
        let pos = self.pos.min(self.text.len());
        let line_end = |from: usize| {
            self.text[from..]
                .find('\n')
                .map_or(self.text.len(), |i| from + i)
        };
        match self.context_start {
            Some(start) if start <= pos => {
                let before = &self.text[start..pos];
                let end = if before.ends_with('\n') {
                    pos
                } else {
                    line_end(pos)
                };
                let context = self.text[start..end].trim_end_matches(['\r', '\n']);
                let column = before.lines().last().map_or(0, |l| l.chars().count());
                (context.to_string(), column)
            }
            _ => {
                let line_start = self.text[..pos].rfind('\n').map_or(0, |i| i + 1);
                let context = self.text[line_start..line_end(pos)].trim_end_matches('\r');
                let column = self.text[line_start..pos].chars().count();
                (context.to_string(), column)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tok {
        At,
        Name,
        LBrace,
        LParen,
    }

    fn name() -> Pattern<Tok> {
        Pattern::new(Tok::Name, r"[a-z]+", "a name")
    }

    #[test]
    fn test_skip_to_counts_lines() {
        let at = Pattern::literal(Tok::At, "@");
        let mut scanner = Scanner::new("junk\nmore junk\n@article");
        let token = scanner.skip_to(&[&at]).unwrap();
        assert_eq!(token.value, "junk\nmore junk\n@");
        assert_eq!(scanner.line(), 3);
        assert_eq!(scanner.rest(), "article");
        assert!(scanner.skip_to(&[&at]).is_none());
    }

    #[test]
    fn test_required_describes_alternatives() {
        let lbrace = Pattern::literal(Tok::LBrace, "{");
        let lparen = Pattern::literal(Tok::LParen, "(");
        let mut scanner = Scanner::new("@article\n  [");
        let at = Pattern::literal(Tok::At, "@");
        scanner.required(&[&at], None).unwrap();
        assert_eq!(scanner.required(&[&name()], None).unwrap().value, "article");
        let err = scanner.required(&[&lparen, &lbrace], None).unwrap_err();
        assert_eq!(err.to_string(), "syntax error in line 2: '(' or '{' expected");
        assert_eq!(err.marked_context().unwrap(), "  [\n ^^^");
    }

    #[test]
    fn test_eof_handling() {
        let mut scanner = Scanner::new("   ");
        assert!(scanner.optional_or_eof(&[&name()]).unwrap().is_none());
        let err = scanner.optional(&[&name()]).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::PrematureEof);
    }

    #[test]
    fn test_no_whitespace_skipping() {
        let mut scanner = Scanner::new(" abc");
        scanner.skip_whitespace = false;
        assert!(scanner.optional(&[&name()]).unwrap().is_none());
        assert_eq!(scanner.pos(), 0);
    }
}
