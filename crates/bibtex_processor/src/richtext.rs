/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Backend-neutral formatted text.
//!
//! Native styles build a [`Text`] for every entry; a
//! [`Backend`](crate::render::Backend) turns it into markup.

use crate::render::Backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Emph,
    Strong,
}

/// Typographic symbols whose spelling depends on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Ndash,
    /// Separator between the blocks of an entry (`\newblock`).
    Newblock,
    Nbsp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Plain(String),
    Tag(Tag, Text),
    Href(String, Text),
    Symbol(Symbol),
}

impl Fragment {
    fn plaintext(&self, out: &mut String) {
        match self {
            Fragment::Plain(s) => out.push_str(s),
            Fragment::Tag(_, text) | Fragment::Href(_, text) => {
                for part in &text.parts {
                    part.plaintext(out);
                }
            }
            Fragment::Symbol(Symbol::Ndash) => out.push('-'),
            Fragment::Symbol(Symbol::Newblock | Symbol::Nbsp) => out.push(' '),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub parts: Vec<Fragment>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            return Self::new();
        }
        Self {
            parts: vec![Fragment::Plain(s)],
        }
    }

    pub fn symbol(symbol: Symbol) -> Self {
        Self {
            parts: vec![Fragment::Symbol(symbol)],
        }
    }

    pub fn tagged(tag: Tag, text: Text) -> Self {
        if text.is_empty() {
            return text;
        }
        Self {
            parts: vec![Fragment::Tag(tag, text)],
        }
    }

    pub fn href(url: impl Into<String>, text: Text) -> Self {
        Self {
            parts: vec![Fragment::Href(url.into(), text)],
        }
    }

    /// Text with BibTeX ties (`~`) turned into non-breaking spaces.
    pub fn with_ties(s: &str) -> Self {
        let mut text = Text::new();
        for (i, piece) in s.split('~').enumerate() {
            if i > 0 {
                text.push(Fragment::Symbol(Symbol::Nbsp));
            }
            if !piece.is_empty() {
                text.push(Fragment::Plain(piece.to_string()));
            }
        }
        text
    }

    /// Text with runs of hyphens turned into en dashes (page ranges).
    pub fn dashify(s: &str) -> Self {
        let mut text = Text::new();
        for (i, piece) in s.split('-').filter(|p| !p.is_empty()).enumerate() {
            if i > 0 {
                text.push(Fragment::Symbol(Symbol::Ndash));
            }
            text.push(Fragment::Plain(piece.to_string()));
        }
        text
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.parts.push(fragment);
    }

    pub fn append(&mut self, mut other: Text) {
        self.parts.append(&mut other.parts);
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| match part {
            Fragment::Plain(s) => s.is_empty(),
            Fragment::Tag(_, text) | Fragment::Href(_, text) => text.is_empty(),
            Fragment::Symbol(_) => false,
        })
    }

    /// Join the non-empty texts with `sep`.
    pub fn join(texts: impl IntoIterator<Item = Text>, sep: &Text) -> Text {
        let mut joined = Text::new();
        for text in texts.into_iter().filter(|t| !t.is_empty()) {
            if !joined.is_empty() {
                joined.append(sep.clone());
            }
            joined.append(text);
        }
        joined
    }

    /// The text without markup.
    pub fn plaintext(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            part.plaintext(&mut out);
        }
        out
    }

    /// Append a period unless the text already ends a sentence.
    pub fn add_period(mut self) -> Self {
        let plain = self.plaintext();
        let end = plain.trim_end_matches('}');
        if end.is_empty() || end.ends_with(['.', '!', '?']) {
            return self;
        }
        self.push(Fragment::Plain(".".to_string()));
        self
    }

    /// Upper-case the first character. Text that opens with a brace
    /// group is protected and left alone.
    pub fn capfirst(mut self) -> Self {
        capfirst_parts(&mut self.parts);
        self
    }

    pub fn render(&self, backend: &dyn Backend) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Fragment::Plain(s) => out.push_str(&backend.text(s)),
                Fragment::Tag(tag, text) => out.push_str(&backend.tag(*tag, text.render(backend))),
                Fragment::Href(url, text) => out.push_str(&backend.href(url, text.render(backend))),
                Fragment::Symbol(symbol) => out.push_str(backend.symbol(*symbol)),
            }
        }
        out
    }
}

/// Returns true once the first character has been seen.
fn capfirst_parts(parts: &mut [Fragment]) -> bool {
    for part in parts {
        match part {
            Fragment::Plain(s) if s.is_empty() => continue,
            Fragment::Plain(s) => {
                let mut chars = s.chars();
                if let Some(first) = chars.next() {
                    if first != '{' {
                        *s = first.to_uppercase().chain(chars).collect();
                    }
                }
                return true;
            }
            Fragment::Tag(_, text) | Fragment::Href(_, text) => {
                if capfirst_parts(&mut text.parts) {
                    return true;
                }
            }
            Fragment::Symbol(_) => return true,
        }
    }
    false
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::plain(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::plain(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Html, Latex, PlainText};

    #[test]
    fn test_add_period() {
        assert_eq!(Text::plain("Title").add_period().plaintext(), "Title.");
        assert_eq!(Text::plain("Why?").add_period().plaintext(), "Why?");
        let emph = Text::tagged(Tag::Emph, Text::plain("Done."));
        assert_eq!(emph.clone().add_period(), emph);
        assert_eq!(Text::new().add_period(), Text::new());
    }

    #[test]
    fn test_capfirst() {
        assert_eq!(Text::plain("über alles").capfirst().plaintext(), "Über alles");
        assert_eq!(Text::plain("{pH} values").capfirst().plaintext(), "{pH} values");
        let nested = Text::tagged(Tag::Emph, Text::plain("journal")).capfirst();
        assert_eq!(nested.plaintext(), "Journal");
    }

    #[test]
    fn test_join_skips_empty_parts() {
        let joined = Text::join(
            [Text::plain("a"), Text::new(), Text::plain("b")],
            &Text::plain(", "),
        );
        assert_eq!(joined.plaintext(), "a, b");
    }

    #[test]
    fn test_dashify_and_ties() {
        let pages = Text::dashify("100--120");
        assert_eq!(pages.render(&Latex), "100--120");
        assert_eq!(pages.render(&Html), "100&ndash;120");
        assert_eq!(pages.render(&PlainText), "100\u{2013}120");
        assert_eq!(Text::with_ties("D.~E. Knuth").render(&Html), "D.&nbsp;E. Knuth");
    }

    #[test]
    fn test_render_markup() {
        let mut text = Text::plain("See ");
        text.append(Text::tagged(Tag::Emph, Text::plain("The {TeX}book")));
        text.append(Text::plain(" & more"));
        assert_eq!(text.render(&Latex), r"See \emph{The {TeX}book} & more");
        assert_eq!(text.render(&Html), "See <em>The TeXbook</em> &amp; more");
        assert_eq!(text.render(&PlainText), "See The TeXbook & more");
        let link = Text::href("https://example.org", Text::plain("site"));
        assert_eq!(link.render(&Html), r#"<a href="https://example.org">site</a>"#);
    }
}
