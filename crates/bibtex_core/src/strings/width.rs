/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

/// Width of a character in hundredths of a point of cmr10, the table BibTeX
/// uses for `width$`. Characters outside printable ASCII have width 0.
pub fn char_width(c: char) -> i64 {
    match c {
        ' ' | '!' | '\'' | ',' | '.' | ':' | ';' | '<' | '[' | ']' | '_' | '`' | 'i' | 'l' => 278,
        '(' | ')' | 't' => 389,
        '"' | '$' | '*' | '/' | '0'..='9' | '\\' | '^' | 'a' | 'o' | 'g' | '{' | '}' | '~' => 500,
        '#' | '%' | 'm' => 833,
        '&' | '+' | '=' | '@' | 'K' | 'O' | 'Q' => 778,
        '-' => 333,
        '>' | '?' => 472,
        'A' | 'H' | 'N' | 'U' | 'V' | 'X' | 'Y' => 750,
        'B' => 708,
        'C' | 'T' => 722,
        'D' => 764,
        'E' | 'P' => 681,
        'F' => 653,
        'G' => 785,
        'I' => 361,
        'J' => 514,
        'L' => 625,
        'M' => 917,
        'R' => 736,
        'S' => 556,
        'W' => 1028,
        'Z' => 611,
        'b' | 'd' | 'h' | 'n' | 'p' | 'u' => 556,
        'c' | 'e' | 'z' => 444,
        'f' | 'j' => 306,
        'k' | 'q' | 'v' | 'x' | 'y' => 528,
        'r' => 392,
        's' => 394,
        'w' => 722,
        '|' => 1000,
        _ => 0,
    }
}
