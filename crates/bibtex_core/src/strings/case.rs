/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use super::BraceAwareChars;

/// A `change.case$` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Lower,
    Upper,
    /// Lower-case everything except the first character of the string and
    /// the first character after a colon followed by whitespace.
    Title,
}

impl CaseMode {
    /// Parse the mode from its first letter (`l`, `u` or `t`, any case).
    pub fn from_mode_string(mode: &str) -> Option<Self> {
        match mode.chars().next()?.to_ascii_lowercase() {
            'l' => Some(CaseMode::Lower),
            'u' => Some(CaseMode::Upper),
            't' => Some(CaseMode::Title),
            _ => None,
        }
    }

    fn convert(self, text: &str, state: State) -> String {
        match self {
            CaseMode::Lower => text.to_lowercase(),
            CaseMode::Upper => text.to_uppercase(),
            CaseMode::Title if state == State::Start => text.to_string(),
            CaseMode::Title => text.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AfterColon,
    Normal,
}

/// Change the case of `s`, leaving braced text alone.
///
/// Special characters (`{\command ...}`) are converted word by word;
/// words that are control sequences keep their case.
pub fn change_case(s: &str, mode: CaseMode) -> String {
    let mut out = String::with_capacity(s.len());
    let mut state = State::Start;
    for token in BraceAwareChars::new(s) {
        if token.depth == 0 {
            out.push_str(&mode.convert(token.text, state));
            state = match token.text {
                ":" => State::AfterColon,
                t if state == State::AfterColon && t.chars().all(char::is_whitespace) => {
                    State::Start
                }
                _ => State::Normal,
            };
        } else if token.is_special() {
            let words: Vec<String> = token
                .text
                .split(' ')
                .map(|word| {
                    if word.starts_with('\\') {
                        word.to_string()
                    } else {
                        mode.convert(word, state)
                    }
                })
                .collect();
            out.push_str(&words.join(" "));
        } else {
            out.push_str(token.text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_modes() {
        assert_eq!(change_case("aBcD", CaseMode::Lower), "abcd");
        assert_eq!(change_case("aBcD", CaseMode::Upper), "ABCD");
        assert_eq!(change_case("ABcD", CaseMode::Title), "Abcd");
    }

    #[test]
    fn test_braces_protect_case() {
        assert_eq!(
            change_case(r"The {\TeX book \noop}", CaseMode::Upper),
            r"THE {\TeX BOOK \noop}"
        );
        assert_eq!(
            change_case("And {Now: BOOO!!!}", CaseMode::Title),
            "And {Now: BOOO!!!}"
        );
        assert_eq!(
            change_case("And {Now: {BOOO}!!!}", CaseMode::Lower),
            "and {Now: {BOOO}!!!}"
        );
    }

    #[test]
    fn test_title_after_colon() {
        assert_eq!(
            change_case("And Now: BOOO!!!", CaseMode::Title),
            "And now: Booo!!!"
        );
    }

    #[test]
    fn test_special_characters_convert_words() {
        assert_eq!(
            change_case(r"And {\Now: BOOO!!!}", CaseMode::Title),
            r"And {\Now: booo!!!}"
        );
        assert_eq!(
            change_case(r"And {\Now: {BOOO}!!!}", CaseMode::Lower),
            r"and {\Now: {booo}!!!}"
        );
        assert_eq!(
            change_case(r"{\TeX\ and databases\Dash\TeX DBI}", CaseMode::Title),
            r"{\TeX\ and databases\Dash\TeX DBI}"
        );
    }

    #[test]
    fn test_mode_letters() {
        assert_eq!(CaseMode::from_mode_string("T"), Some(CaseMode::Title));
        assert_eq!(CaseMode::from_mode_string("upper"), Some(CaseMode::Upper));
        assert_eq!(CaseMode::from_mode_string("x"), None);
        assert_eq!(CaseMode::from_mode_string(""), None);
    }
}
