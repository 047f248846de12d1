/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Brace-aware string utilities.
//!
//! BibTeX measures, truncates and case-converts field values in terms of
//! "characters" that know about TeX grouping:
//!
//! - braces themselves never count as characters;
//! - a group opened at brace depth 0 whose first character is a backslash
//!   (`{\'e}`, `{\ss}`, `{\noopsort{1973b}}`) is a *special character*: it
//!   counts as exactly one character and is case-converted word by word;
//! - everything else counts one per character.
//!
//! All operations here walk the same token stream produced by
//! [`BraceAwareChars`], so the special-character rule is applied
//! identically everywhere.

mod case;
mod split;
mod width;
mod wrap;

use std::sync::OnceLock;

use regex::Regex;

pub use case::{change_case, CaseMode};
pub use split::{
    bibtex_abbreviate, bibtex_first_letter, normalize_whitespace, split_name_list,
    split_tex_string, split_words,
};
pub use width::char_width;
pub use wrap::{wrap, WRAP_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceTokenKind {
    /// An opening brace; `depth` is the depth of the group it opens.
    Open,
    /// A closing brace; `depth` is the depth after closing. Unmatched
    /// closing braces at depth 0 are reported as `Close` too.
    Close,
    /// A single character, or the whole inner text of a special character.
    Text,
}

/// One token of a brace-aware scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceToken<'a> {
    pub kind: BraceTokenKind,
    pub text: &'a str,
    pub depth: usize,
}

impl BraceToken<'_> {
    pub fn is_brace(&self) -> bool {
        !matches!(self.kind, BraceTokenKind::Text)
    }

    /// A backslash-led token at depth 1: the body of a special character.
    pub fn is_special(&self) -> bool {
        self.depth == 1 && self.text.starts_with('\\')
    }
}

/// Iterator over the [`BraceToken`]s of a string.
///
/// Special characters come out as three tokens: `{` at depth 1, their
/// entire inner text (nested braces included) at depth 1, and `}` at
/// depth 0. The closing token is produced even if the source never closes
/// the group.
#[derive(Debug, Clone)]
pub struct BraceAwareChars<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
    pending: Vec<BraceToken<'a>>,
}

impl<'a> BraceAwareChars<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
            pending: Vec::new(),
        }
    }
}

/// Byte offset of the `}` closing a group whose contents start at `from`.
fn matching_brace(text: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, b) in text.bytes().enumerate().skip(from) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn token(kind: BraceTokenKind, text: &str, depth: usize) -> BraceToken<'_> {
    BraceToken { kind, text, depth }
}

impl<'a> Iterator for BraceAwareChars<'a> {
    type Item = BraceToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop() {
            return Some(token);
        }
        let c = self.text[self.pos..].chars().next()?;
        let start = self.pos;
        self.pos += c.len_utf8();
        match c {
            '{' if self.depth == 0 && self.text[self.pos..].starts_with('\\') => {
                let inner_start = self.pos;
                let inner_end = matching_brace(self.text, inner_start);
                let inner = &self.text[inner_start..inner_end.unwrap_or(self.text.len())];
                self.pos = inner_end.map_or(self.text.len(), |end| end + 1);
                self.pending.push(token(BraceTokenKind::Close, "}", 0));
                self.pending.push(token(BraceTokenKind::Text, inner, 1));
                Some(token(BraceTokenKind::Open, "{", 1))
            }
            '{' => {
                self.depth += 1;
                Some(token(BraceTokenKind::Open, "{", self.depth))
            }
            '}' => {
                self.depth = self.depth.saturating_sub(1);
                Some(token(BraceTokenKind::Close, "}", self.depth))
            }
            _ => Some(token(BraceTokenKind::Text, &self.text[start..self.pos], self.depth)),
        }
    }
}

/// Number of BibTeX characters in `s`.
pub fn bibtex_len(s: &str) -> usize {
    BraceAwareChars::new(s).filter(|t| !t.is_brace()).count()
}

/// The first `n` BibTeX characters of `s`, with any groups left open by
/// the cut closed again.
pub fn bibtex_prefix(s: &str, n: usize) -> String {
    let mut out = String::new();
    if n == 0 {
        return out;
    }
    let mut count = 0;
    let mut depth = 0;
    for token in BraceAwareChars::new(s) {
        out.push_str(token.text);
        depth = token.depth;
        if !token.is_brace() {
            count += 1;
            if count >= n {
                break;
            }
        }
    }
    out.extend(std::iter::repeat('}').take(depth));
    out
}

fn control_sequence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\\[A-Za-z]+").expect("valid regex"))
}

/// Strip everything but letters, digits and word separators.
///
/// Whitespace, `-` and `~` become a single space each; special characters
/// lose their leading control sequence and keep only alphanumerics.
pub fn bibtex_purify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for token in BraceAwareChars::new(s) {
        if token.is_special() {
            let body = control_sequence_re().replace(token.text, "");
            out.extend(body.chars().filter(|c| c.is_alphanumeric()));
        } else if token.is_brace() {
            continue;
        } else if token.text.chars().all(char::is_alphanumeric) {
            out.push_str(token.text);
        } else if token.text.chars().all(char::is_whitespace) || matches!(token.text, "-" | "~") {
            out.push(' ');
        }
    }
    out
}

/// Substring by raw character positions, 1-based. A negative `start`
/// counts from the end of the string (`-1` is the last character) and
/// selects the `length` characters ending there. `start == 0` yields an
/// empty string.
pub fn bibtex_substring(s: &str, start: i64, length: i64) -> String {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len() as i64;
    let (start0, end0) = match start {
        0 => return String::new(),
        s if s > 0 => (s - 1, (s - 1).saturating_add(length)),
        s => {
            let end0 = len.saturating_add(s).saturating_add(1);
            (end0.saturating_sub(length), end0)
        }
    };
    let start0 = start0.clamp(0, len) as usize;
    let end0 = end0.clamp(0, len) as usize;
    if start0 >= end0 {
        return String::new();
    }
    chars[start0..end0].iter().collect()
}

/// Width of `s` in BibTeX's units (the cmr10 character widths).
pub fn bibtex_width(s: &str) -> i64 {
    let mut width = 0i64;
    for token in BraceAwareChars::new(s) {
        if token.is_special() {
            width += token
                .text
                .chars()
                .skip(2)
                .filter(|c| !matches!(c, '{' | '}'))
                .map(char_width)
                .sum::<i64>();
            // the surrounding braces are counted as ordinary tokens
            width -= 1000;
        } else {
            width += token.text.chars().map(char_width).sum::<i64>();
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<(&str, usize)> {
        BraceAwareChars::new(s).map(|t| (t.text, t.depth)).collect()
    }

    #[test]
    fn test_scan_special_char() {
        assert_eq!(
            tokens(r"a{\'e}"),
            vec![("a", 0), ("{", 1), (r"\'e", 1), ("}", 0)]
        );
        assert_eq!(tokens(r"{\abc"), vec![("{", 1), (r"\abc", 1), ("}", 0)]);
    }

    #[test]
    fn test_scan_nested_groups() {
        assert_eq!(
            tokens("{a{b}}"),
            vec![("{", 1), ("a", 1), ("{", 2), ("b", 2), ("}", 1), ("}", 0)]
        );
        assert_eq!(tokens("}a"), vec![("}", 0), ("a", 0)]);
    }

    #[test]
    fn test_len() {
        assert_eq!(bibtex_len(r"de la Vall{\'e}e Poussin"), 20);
        assert_eq!(bibtex_len(r"de la Vall{e}e Poussin"), 20);
        assert_eq!(bibtex_len(r"\ABC 123"), 8);
        assert_eq!(bibtex_len(r"{\abc}"), 1);
        assert_eq!(bibtex_len(r"{\abc"), 1);
        assert_eq!(bibtex_len(r"}\abc"), 4);
        assert_eq!(bibtex_len(r"\abc{"), 4);
        assert_eq!(bibtex_len("level 0 {1 {2}}"), 11);
        assert_eq!(bibtex_len(r"level 0 {\1 {2}}"), 9);
        assert_eq!(bibtex_len(r"level 0 {1 {\2}}"), 12);
        assert_eq!(bibtex_len(r"{\'e}"), 1);
        assert_eq!(bibtex_len("a{b}c"), 3);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(bibtex_prefix("abc", 1), "a");
        assert_eq!(bibtex_prefix("abc", 5), "abc");
        assert_eq!(bibtex_prefix("ab{c}d", 3), "ab{c}");
        assert_eq!(bibtex_prefix("ab{cd}", 3), "ab{c}");
        assert_eq!(bibtex_prefix("ab{cd", 3), "ab{c}");
        assert_eq!(bibtex_prefix(r"ab{\cd}", 3), r"ab{\cd}");
        assert_eq!(bibtex_prefix(r"ab{\cd", 3), r"ab{\cd}");
        assert_eq!(bibtex_prefix("abc", 0), "");
    }

    #[test]
    fn test_purify() {
        assert_eq!(bibtex_purify("Abc 1234"), "Abc 1234");
        assert_eq!(bibtex_purify("Abc  1234"), "Abc  1234");
        assert_eq!(bibtex_purify("Abc-Def"), "Abc Def");
        assert_eq!(bibtex_purify("Abc-~-Def"), "Abc   Def");
        assert_eq!(bibtex_purify("{XXX YYY}"), "XXX YYY");
        assert_eq!(bibtex_purify("{XXX {YYY}}"), "XXX YYY");
        assert_eq!(bibtex_purify(r"XXX {\YYY} XXX"), "XXX  XXX");
        assert_eq!(bibtex_purify(r"{XXX {\YYY} XXX}"), "XXX YYY XXX");
        assert_eq!(bibtex_purify(r"\\abc def"), "abc def");
        assert_eq!(bibtex_purify("a@#$@#$b@#$@#$c"), "abc");
        assert_eq!(bibtex_purify(r"{\noopsort{1973b}}1973"), "1973b1973");
        assert_eq!(bibtex_purify(r"{sort{1973b}}1973"), "sort1973b1973");
        assert_eq!(bibtex_purify(r"Poincar{\'e}"), "Poincare");
    }

    #[test]
    fn test_substring() {
        assert_eq!(bibtex_substring("abcdef", 1, 3), "abc");
        assert_eq!(bibtex_substring("abcdef", 2, 3), "bcd");
        assert_eq!(bibtex_substring("abcdef", 2, 1000), "bcdef");
        assert_eq!(bibtex_substring("abcdef", 0, 1000), "");
        assert_eq!(bibtex_substring("abcdef", -1, 1), "f");
        assert_eq!(bibtex_substring("abcdef", -1, 2), "ef");
        assert_eq!(bibtex_substring("abcdef", -2, 3), "cde");
        assert_eq!(bibtex_substring("abcdef", -2, 1000), "abcde");
        assert_eq!(bibtex_substring("abcdef", 3, -1), "");
    }

    #[test]
    fn test_substring_extreme_arguments() {
        assert_eq!(bibtex_substring("abcdef", 2, i64::MAX), "bcdef");
        assert_eq!(bibtex_substring("abcdef", i64::MAX, 1), "");
        assert_eq!(bibtex_substring("abcdef", i64::MAX, i64::MAX), "");
        assert_eq!(bibtex_substring("abcdef", -1, i64::MAX), "abcdef");
        assert_eq!(bibtex_substring("abcdef", -1, i64::MIN), "");
        assert_eq!(bibtex_substring("abcdef", i64::MIN, 3), "");
        assert_eq!(bibtex_substring("abcdef", i64::MIN, i64::MIN), "");
    }

    #[test]
    fn test_width() {
        assert_eq!(bibtex_width(""), 0);
        assert_eq!(bibtex_width("abc"), 1500);
        assert_eq!(bibtex_width("ab{c}"), 2500);
        assert_eq!(bibtex_width(r"ab{\'c}"), 1500);
        assert_eq!(bibtex_width(r"ab{\'c{}}"), 1500);
        assert_eq!(bibtex_width(r"ab{\'c{}"), 1500);
        assert_eq!(bibtex_width(r"ab{\'c{d}}"), 2056);
    }
}
