/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

/// Line width used when flushing `.bbl` output.
pub const WRAP_WIDTH: usize = 79;

const CONTINUATION_INDENT: &str = "  ";

/// Split into alternating words and single whitespace characters, keeping
/// the empty words between adjacent whitespace.
fn chunks(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut word_start = 0;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            out.push(&s[word_start..i]);
            out.push(&s[i..i + c.len_utf8()]);
            word_start = i + c.len_utf8();
        }
    }
    out.push(&s[word_start..]);
    out
}

/// BibTeX's greedy line filling: lines are at most `width` characters
/// (including indentation), continuation lines are indented by two spaces
/// and lines are never broken inside a word.
pub fn wrap(s: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line: Vec<&str> = Vec::new();
    let mut current_width = 0;
    let mut indent = "";

    let flush = |line: &mut Vec<&str>, indent: &str, lines: &mut Vec<String>| {
        if line.is_empty() {
            return;
        }
        if line[0] == " " {
            line.remove(0);
        }
        lines.push(format!("{indent}{}", line.concat().trim_end()));
    };

    for chunk in chunks(s) {
        let max_width = width.saturating_sub(indent.len());
        let chunk_len = chunk.chars().count();
        if current_width + chunk_len <= max_width {
            line.push(chunk);
            current_width += chunk_len;
        } else {
            flush(&mut line, indent, &mut lines);
            indent = CONTINUATION_INDENT;
            line = vec![chunk];
            current_width = chunk_len;
        }
    }
    flush(&mut line, indent, &mut lines);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_untouched() {
        assert_eq!(wrap("\\bibitem{k1}", WRAP_WIDTH), "\\bibitem{k1}");
        assert_eq!(wrap("", WRAP_WIDTH), "");
    }

    #[test]
    fn test_continuation_indent() {
        let text = "aaaa bbbb cccc dddd";
        assert_eq!(wrap(text, 10), "aaaa bbbb\n  cccc\n  dddd");
    }

    #[test]
    fn test_long_word_is_not_split() {
        assert_eq!(wrap("abcdefghijklmnop qr", 8), "  abcdefghijklmnop\n  qr");
    }

    #[test]
    fn test_bbl_width() {
        let words = vec!["word"; 20].join(" ");
        let wrapped = wrap(&words, WRAP_WIDTH);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].len() <= WRAP_WIDTH);
        assert!(lines[1].starts_with("  word"));
    }
}
