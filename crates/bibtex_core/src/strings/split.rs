/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use std::sync::OnceLock;

use regex::Regex;

use super::BraceAwareChars;

fn words_sep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A[\s~]+").expect("valid regex"))
}

fn and_sep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A and ").expect("valid regex"))
}

fn hyphen_sep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A-").expect("valid regex"))
}

/// Split `s` at matches of `sep` that occur at brace depth 0.
///
/// `sep` must be anchored (`\A...`). Separators at the very start or
/// running to the very end of the string do not split. Parts are trimmed
/// when `strip` is set and empty parts dropped when `filter_empty` is set.
pub fn split_tex_string(s: &str, sep: &Regex, strip: bool, filter_empty: bool) -> Vec<String> {
    let mut depth = 0i64;
    let mut part_start = 0;
    let mut parts = Vec::new();
    for (pos, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ if depth == 0 && pos > 0 => {
                if let Some(m) = sep.find(&s[pos..]) {
                    if pos + m.end() < s.len() {
                        parts.push(s.get(part_start..pos).unwrap_or_default());
                        part_start = pos + m.end();
                    }
                }
            }
            _ => {}
        }
    }
    if part_start < s.len() {
        parts.push(&s[part_start..]);
    }
    parts
        .into_iter()
        .map(|p| if strip { p.trim() } else { p })
        .filter(|p| !filter_empty || !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on runs of whitespace and `~` outside braces.
pub fn split_words(s: &str) -> Vec<String> {
    split_tex_string(s, words_sep_re(), true, true)
}

/// Split a BibTeX name list on top-level `" and "`.
pub fn split_name_list(s: &str) -> Vec<String> {
    split_tex_string(s, and_sep_re(), true, false)
}

/// Collapse every run of whitespace into one space and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first letter of `s`, or its first special character (returned with
/// its braces, e.g. `{\TeX}`), or an empty string.
pub fn bibtex_first_letter(s: &str) -> String {
    for token in BraceAwareChars::new(s).filter(|t| !t.is_brace()) {
        if token.text.starts_with('\\') && token.text != "\\" {
            if token.is_special() {
                return format!("{{{}}}", token.text);
            }
        } else if token.text.chars().all(char::is_alphabetic) {
            return token.text.to_string();
        }
    }
    String::new()
}

/// Abbreviate a (possibly hyphenated) name part: `Jean-Pierre` becomes
/// `J.-P` with the default delimiter `.-`.
pub fn bibtex_abbreviate(s: &str, delimiter: Option<&str>) -> String {
    let letters: Vec<String> = split_tex_string(s, hyphen_sep_re(), true, false)
        .iter()
        .map(|part| bibtex_first_letter(part))
        .filter(|letter| !letter.is_empty())
        .collect();
    letters.join(delimiter.unwrap_or(".-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name_list() {
        assert_eq!(split_name_list("Johnson and Peterson"), ["Johnson", "Peterson"]);
        assert_eq!(split_name_list("Armand and anderssen"), ["Armand", "anderssen"]);
        assert_eq!(
            split_name_list("What a Strange{ }and Bizzare Name! and Peterson"),
            ["What a Strange{ }and Bizzare Name!", "Peterson"]
        );
        assert_eq!(
            split_name_list("{Barnes and Noble} and Smith"),
            ["{Barnes and Noble}", "Smith"]
        );
    }

    #[test]
    fn test_split_words() {
        assert!(split_words("").is_empty());
        assert!(split_words("     ").is_empty());
        assert_eq!(split_words("Matsui      Fuuka"), ["Matsui", "Fuuka"]);
        assert_eq!(split_words("{Matsui      Fuuka}"), ["{Matsui      Fuuka}"]);
        assert_eq!(split_words("on a"), ["on", "a"]);
        assert_eq!(split_words("Jean~Paul"), ["Jean", "Paul"]);
    }

    #[test]
    fn test_split_custom_separator() {
        let dot = Regex::new(r"\A\.").unwrap();
        assert_eq!(split_tex_string(".a.b.c.", &dot, true, false), [".a", "b", "c."]);
        assert_eq!(
            split_tex_string(".a.b.c.{d.}.", &dot, true, false),
            [".a", "b", "c", "{d.}."]
        );
    }

    #[test]
    fn test_first_letter() {
        assert_eq!(bibtex_first_letter("Andrew Blake"), "A");
        assert_eq!(bibtex_first_letter("{Andrew} Blake"), "A");
        assert_eq!(bibtex_first_letter("1Andrew"), "A");
        assert_eq!(bibtex_first_letter(r"{\TeX} markup"), r"{\TeX}");
        assert_eq!(bibtex_first_letter(""), "");
        assert_eq!(bibtex_first_letter("123 123 123 {}"), "");
        assert_eq!(bibtex_first_letter(r"\LaTeX Project Team"), "L");
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(bibtex_abbreviate("Andrew Blake", None), "A");
        assert_eq!(bibtex_abbreviate("Jean-Pierre", None), "J.-P");
        assert_eq!(bibtex_abbreviate("Jean--Pierre", None), "J.-P");
        assert_eq!(bibtex_abbreviate("Phony-Baloney", Some("")), "PB");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("Polluted\n with {DDT}.\n "), "Polluted with {DDT}.");
    }
}
