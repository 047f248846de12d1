/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! `.bst` style program parser.
//!
//! A style file is a flat sequence of commands, each a case-insensitive
//! name followed by a fixed number of brace groups:
//!
//! ```text
//! ENTRY { author title } { } { label }
//! FUNCTION { output.entry } { cite$ write$ newline$ }
//! READ
//! ITERATE { output.entry }
//! ```
//!
//! Unlike `.bib` parsing, every syntax error is fatal: a style program
//! must be well formed before any of it runs.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use bibtex_core::scanner::{Pattern, Scanner};
use bibtex_core::{Encoding, Result, SyntaxError, SyntaxErrorKind};

/// One element of a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `"text"`, pushed as a string.
    Str(String),
    /// `#42`, pushed as an integer.
    Int(i64),
    /// A bare name: execute the function or push the variable's value.
    Identifier(String),
    /// `'name`: push the variable (or function) itself.
    QuotedVar(String),
    /// `{ ... }` inside a body: pushed as an anonymous function.
    Function(Rc<[Literal]>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "\"{s}\""),
            Literal::Int(n) => write!(f, "#{n}"),
            Literal::Identifier(name) => f.write_str(name),
            Literal::QuotedVar(name) => write!(f, "'{name}"),
            Literal::Function(body) => {
                f.write_str("{")?;
                for literal in body.iter() {
                    write!(f, " {literal}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Entry {
        fields: Vec<String>,
        integers: Vec<String>,
        strings: Vec<String>,
    },
    Execute(String),
    Function { name: String, body: Rc<[Literal]> },
    Integers(Vec<String>),
    Iterate(String),
    Macro { name: String, value: String },
    Read,
    Reverse(String),
    Sort,
    Strings(Vec<String>),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Entry { .. } => "ENTRY",
            Command::Execute(_) => "EXECUTE",
            Command::Function { .. } => "FUNCTION",
            Command::Integers(_) => "INTEGERS",
            Command::Iterate(_) => "ITERATE",
            Command::Macro { .. } => "MACRO",
            Command::Read => "READ",
            Command::Reverse(_) => "REVERSE",
            Command::Sort => "SORT",
            Command::Strings(_) => "STRINGS",
        }
    }
}

/// A parsed style program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BstProgram {
    pub commands: Vec<Command>,
}

impl BstProgram {
    pub fn parse(text: &str) -> Result<Self> {
        parse_bst_str(text, None)
    }

    pub fn from_file(path: &Path, encoding: Encoding) -> Result<Self> {
        let text = encoding.read_file(path)?;
        parse_bst_str(&text, Some(&path.display().to_string()))
    }
}

/// Remove a `%` comment from one line. A `%` inside a double-quoted
/// string is kept.
pub fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '%' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok {
    LBrace,
    RBrace,
    Str,
    Int,
    Name,
}

/// Number of brace-group arguments each command takes.
fn arity(command: &str) -> Option<usize> {
    let arity = match command.to_ascii_uppercase().as_str() {
        "ENTRY" => 3,
        "EXECUTE" => 1,
        "FUNCTION" => 2,
        "INTEGERS" => 1,
        "ITERATE" => 1,
        "MACRO" => 2,
        "READ" => 0,
        "REVERSE" => 1,
        "SORT" => 0,
        "STRINGS" => 1,
        _ => return None,
    };
    Some(arity)
}

struct BstParser<'t> {
    scanner: Scanner<'t>,
    lbrace: Pattern<Tok>,
    rbrace: Pattern<Tok>,
    string: Pattern<Tok>,
    integer: Pattern<Tok>,
    name: Pattern<Tok>,
}

impl<'t> BstParser<'t> {
    fn new(text: &'t str, filename: Option<&str>) -> Self {
        let mut scanner = Scanner::new(text);
        if let Some(filename) = filename {
            scanner = scanner.with_filename(filename);
        }
        Self {
            scanner,
            lbrace: Pattern::literal(Tok::LBrace, "{"),
            rbrace: Pattern::literal(Tok::RBrace, "}"),
            string: Pattern::new(Tok::Str, r#""[^"]*""#, "string"),
            integer: Pattern::new(Tok::Int, r"#-?\d+", "integer"),
            name: Pattern::new(Tok::Name, r#"[^#"{}\s]+"#, "name"),
        }
    }

    fn parse(mut self) -> std::result::Result<BstProgram, SyntaxError> {
        let mut commands = Vec::new();
        while let Some(command) = self.parse_command()? {
            commands.push(command);
        }
        Ok(BstProgram { commands })
    }

    fn parse_command(&mut self) -> std::result::Result<Option<Command>, SyntaxError> {
        let Some(token) = self.scanner.required_or_eof(&[&self.name], Some("BST command"))? else {
            return Ok(None);
        };
        let name = token.value;
        let Some(arity) = arity(name) else {
            return Err(self
                .scanner
                .error(SyntaxErrorKind::Syntax, "BST command expected"));
        };
        let mut args = Vec::with_capacity(arity);
        for _ in 0..arity {
            self.scanner.required(&[&self.lbrace], None)?;
            args.push(self.parse_group()?);
        }
        tracing::trace!(command = name, "parsed BST command");
        self.build_command(name, args).map(Some)
    }

    fn parse_group(&mut self) -> std::result::Result<Vec<Literal>, SyntaxError> {
        let mut literals = Vec::new();
        loop {
            let token = self.scanner.required(
                &[&self.lbrace, &self.rbrace, &self.string, &self.integer, &self.name],
                None,
            )?;
            let literal = match token.kind {
                Tok::LBrace => Literal::Function(self.parse_group()?.into()),
                Tok::RBrace => break,
                Tok::Str => Literal::Str(token.value[1..token.value.len() - 1].to_string()),
                Tok::Int => match token.value[1..].parse() {
                    Ok(n) => Literal::Int(n),
                    Err(_) => {
                        return Err(self.scanner.error(
                            SyntaxErrorKind::Syntax,
                            format!("integer out of range: {}", token.value),
                        ))
                    }
                },
                Tok::Name => match token.value.strip_prefix('\'') {
                    Some(name) => Literal::QuotedVar(name.to_string()),
                    None => Literal::Identifier(token.value.to_string()),
                },
            };
            literals.push(literal);
        }
        Ok(literals)
    }

    fn build_command(
        &self,
        name: &str,
        mut args: Vec<Vec<Literal>>,
    ) -> std::result::Result<Command, SyntaxError> {
        let command = match name.to_ascii_uppercase().as_str() {
            "ENTRY" => {
                let strings = self.names(args.pop())?;
                let integers = self.names(args.pop())?;
                let fields = self.names(args.pop())?;
                Command::Entry {
                    fields,
                    integers,
                    strings,
                }
            }
            "EXECUTE" => Command::Execute(self.single_name(args.pop())?),
            "FUNCTION" => {
                let body = args.pop().unwrap_or_default();
                Command::Function {
                    name: self.single_name(args.pop())?,
                    body: body.into(),
                }
            }
            "INTEGERS" => Command::Integers(self.names(args.pop())?),
            "ITERATE" => Command::Iterate(self.single_name(args.pop())?),
            "MACRO" => {
                let value = match args.pop().as_deref() {
                    Some([Literal::Str(value)]) => value.clone(),
                    _ => {
                        return Err(self
                            .scanner
                            .error(SyntaxErrorKind::Syntax, "macro value expected"))
                    }
                };
                Command::Macro {
                    name: self.single_name(args.pop())?,
                    value,
                }
            }
            "READ" => Command::Read,
            "REVERSE" => Command::Reverse(self.single_name(args.pop())?),
            "SORT" => Command::Sort,
            "STRINGS" => Command::Strings(self.names(args.pop())?),
            _ => {
                return Err(self
                    .scanner
                    .error(SyntaxErrorKind::Syntax, "BST command expected"))
            }
        };
        Ok(command)
    }

    /// A group that may only contain plain identifiers.
    fn names(&self, group: Option<Vec<Literal>>) -> std::result::Result<Vec<String>, SyntaxError> {
        group
            .unwrap_or_default()
            .into_iter()
            .map(|literal| match literal {
                Literal::Identifier(name) => Ok(name),
                other => Err(self.scanner.error(
                    SyntaxErrorKind::Syntax,
                    format!("identifier expected, found {other}"),
                )),
            })
            .collect()
    }

    fn single_name(&self, group: Option<Vec<Literal>>) -> std::result::Result<String, SyntaxError> {
        let mut names = self.names(group)?;
        if names.len() != 1 {
            return Err(self
                .scanner
                .error(SyntaxErrorKind::Syntax, "a single identifier expected"));
        }
        Ok(names.remove(0))
    }
}

/// Parse style source text. Comments are stripped line by line first.
pub fn parse_bst_str(text: &str, filename: Option<&str>) -> Result<BstProgram> {
    let source = text
        .lines()
        .map(|line| strip_comment(line.trim_end()))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(BstParser::new(&source, filename).parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Literal {
        Literal::Identifier(name.to_string())
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a normal line"), "a normal line");
        assert_eq!(strip_comment("%"), "");
        assert_eq!(strip_comment("trailing%"), "trailing");
        assert_eq!(strip_comment("a normal line% and a comment"), "a normal line");
        assert_eq!(
            strip_comment(r#""100% compatibility" is a myth"#),
            r#""100% compatibility" is a myth"#
        );
        assert_eq!(
            strip_comment(r#""100% compatibility" is a myth% or not?"#),
            r#""100% compatibility" is a myth"#
        );
    }

    #[test]
    fn test_parse_commands() {
        let program = BstProgram::parse(
            r#"
            % a comment
            ENTRY { author title } { } { label }
            integers { count }
            MACRO {jan} {"January"}
            FUNCTION {output} { 'count #1 + "x" { skip$ } if$ }
            READ
            EXECUTE {output}
            "#,
        )
        .unwrap();
        assert_eq!(
            program.commands,
            vec![
                Command::Entry {
                    fields: vec!["author".into(), "title".into()],
                    integers: vec![],
                    strings: vec!["label".into()],
                },
                Command::Integers(vec!["count".into()]),
                Command::Macro {
                    name: "jan".into(),
                    value: "January".into(),
                },
                Command::Function {
                    name: "output".into(),
                    body: vec![
                        Literal::QuotedVar("count".into()),
                        Literal::Int(1),
                        ident("+"),
                        Literal::Str("x".into()),
                        Literal::Function(vec![ident("skip$")].into()),
                        ident("if$"),
                    ]
                    .into(),
                },
                Command::Read,
                Command::Execute("output".into()),
            ]
        );
    }

    #[test]
    fn test_unknown_command_is_fatal() {
        let err = BstProgram::parse("READ\nFROBNICATE {x}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error in line 2: BST command expected"
        );
    }

    #[test]
    fn test_unclosed_group() {
        let err = BstProgram::parse("FUNCTION {f} { skip$").unwrap_err();
        assert!(matches!(
            err,
            bibtex_core::Error::Syntax(SyntaxError {
                kind: SyntaxErrorKind::PrematureEof,
                ..
            })
        ));
    }

    #[test]
    fn test_percent_inside_string_survives() {
        let program = BstProgram::parse(r#"FUNCTION {f} { "50%" write$ } % done"#).unwrap();
        let Command::Function { body, .. } = &program.commands[0] else {
            panic!("expected a function");
        };
        assert_eq!(body[0], Literal::Str("50%".into()));
    }
}
