/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The built-in functions of the style language.

use bibtex_core::strings::{
    bibtex_len, bibtex_prefix, bibtex_purify, bibtex_substring, bibtex_width, change_case,
    split_name_list, CaseMode,
};
use bibtex_core::{BibTeXError, Person, Result};

use super::{type_mismatch, Interpreter, StackValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Greater,
    Less,
    Equals,
    Plus,
    Minus,
    Concat,
    Assign,
    AddPeriod,
    CallType,
    ChangeCase,
    ChrToInt,
    Cite,
    Duplicate,
    Empty,
    FormatName,
    If,
    IntToChr,
    IntToStr,
    Missing,
    Newline,
    NumNames,
    Pop,
    Preamble,
    Purify,
    Quote,
    Skip,
    Stack,
    Substring,
    Swap,
    TextLength,
    TextPrefix,
    Top,
    Type,
    Warning,
    While,
    Width,
    Write,
}

impl Builtin {
    pub const ALL: [(&'static str, Builtin); 37] = [
        (">", Builtin::Greater),
        ("<", Builtin::Less),
        ("=", Builtin::Equals),
        ("+", Builtin::Plus),
        ("-", Builtin::Minus),
        ("*", Builtin::Concat),
        (":=", Builtin::Assign),
        ("add.period$", Builtin::AddPeriod),
        ("call.type$", Builtin::CallType),
        ("change.case$", Builtin::ChangeCase),
        ("chr.to.int$", Builtin::ChrToInt),
        ("cite$", Builtin::Cite),
        ("duplicate$", Builtin::Duplicate),
        ("empty$", Builtin::Empty),
        ("format.name$", Builtin::FormatName),
        ("if$", Builtin::If),
        ("int.to.chr$", Builtin::IntToChr),
        ("int.to.str$", Builtin::IntToStr),
        ("missing$", Builtin::Missing),
        ("newline$", Builtin::Newline),
        ("num.names$", Builtin::NumNames),
        ("pop$", Builtin::Pop),
        ("preamble$", Builtin::Preamble),
        ("purify$", Builtin::Purify),
        ("quote$", Builtin::Quote),
        ("skip$", Builtin::Skip),
        ("stack$", Builtin::Stack),
        ("substring$", Builtin::Substring),
        ("swap$", Builtin::Swap),
        ("text.length$", Builtin::TextLength),
        ("text.prefix$", Builtin::TextPrefix),
        ("top$", Builtin::Top),
        ("type$", Builtin::Type),
        ("warning$", Builtin::Warning),
        ("while$", Builtin::While),
        ("width$", Builtin::Width),
        ("write$", Builtin::Write),
    ];

    pub fn name(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, b)| *b == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

fn truth(b: bool) -> StackValue {
    StackValue::Int(i64::from(b))
}

/// `add.period$`: append a period unless the text, ignoring closing
/// braces, already ends in sentence punctuation.
pub(crate) fn add_period(s: &str) -> String {
    let stripped = s.trim_end_matches('}');
    if stripped.is_empty() || stripped.ends_with(['.', '!', '?']) {
        s.to_string()
    } else {
        format!("{s}.")
    }
}

fn bad_argument(builtin: Builtin, message: String) -> bibtex_core::Error {
    BibTeXError::BadArgument {
        builtin: builtin.name().to_string(),
        message,
    }
    .into()
}

impl Interpreter {
    pub(super) fn call_builtin(&mut self, builtin: Builtin) -> Result<()> {
        let name = builtin.name();
        match builtin {
            Builtin::Greater | Builtin::Less | Builtin::Plus | Builtin::Minus => {
                let b = self.pop_int(name)?;
                let a = self.pop_int(name)?;
                let result = match builtin {
                    Builtin::Greater => truth(a > b),
                    Builtin::Less => truth(a < b),
                    Builtin::Plus => StackValue::Int(a.wrapping_add(b)),
                    _ => StackValue::Int(a.wrapping_sub(b)),
                };
                self.push(result);
            }
            Builtin::Equals => {
                let b = self.pop()?;
                let a = self.pop()?;
                let equal = match (a, b) {
                    (StackValue::Int(a), StackValue::Int(b)) => a == b,
                    (StackValue::Int(_), _) | (_, StackValue::Int(_)) => false,
                    (a, b) => string_value(a, name)? == string_value(b, name)?,
                };
                self.push(truth(equal));
            }
            Builtin::Concat => {
                let b = self.pop_str(name)?;
                let a = self.pop_str(name)?;
                self.push(StackValue::Str(a + &b));
            }
            Builtin::Assign => {
                let target = self.pop()?;
                let value = self.pop()?;
                match target {
                    StackValue::Var(var) => self.assign(&var, value)?,
                    other => return Err(type_mismatch(name, "variable", &other)),
                }
            }
            Builtin::AddPeriod => match self.pop()? {
                StackValue::Str(s) => self.push(StackValue::Str(add_period(&s))),
                missing @ StackValue::Missing(_) => self.push(missing),
                other => return Err(type_mismatch(name, "string", &other)),
            },
            Builtin::CallType => {
                let entry = self.entry(name)?;
                let (key, entry_type) = (entry.key.clone(), entry.entry_type.clone());
                if self.vars.contains_key(&entry_type) {
                    self.execute_var(&entry_type)?;
                } else {
                    self.diagnostics.report(BibTeXError::UndefinedEntryType(key))?;
                    self.execute_var("default.type")?;
                }
            }
            Builtin::ChangeCase => {
                let mode = self.pop_str(name)?;
                let s = self.pop_str(name)?;
                if mode.is_empty() {
                    return Err(BibTeXError::EmptyCaseMode.into());
                }
                let mode = CaseMode::from_mode_string(&mode)
                    .ok_or_else(|| BibTeXError::BadCaseMode(mode.clone()))?;
                self.push(StackValue::Str(change_case(&s, mode)));
            }
            Builtin::ChrToInt => {
                let s = self.pop_str(name)?;
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.push(StackValue::Int(i64::from(u32::from(c)))),
                    _ => {
                        return Err(bad_argument(
                            builtin,
                            format!("expected a single character, got \"{s}\""),
                        ))
                    }
                }
            }
            Builtin::Cite => {
                let key = self.current_key(name)?.to_string();
                self.push(StackValue::Str(key));
            }
            Builtin::Duplicate => {
                let value = self.pop()?;
                self.push(value.clone());
                self.push(value);
            }
            Builtin::Empty => {
                let empty = match self.pop()? {
                    StackValue::Str(s) => s.trim().is_empty(),
                    StackValue::Missing(_) => true,
                    other => return Err(type_mismatch(name, "string", &other)),
                };
                self.push(truth(empty));
            }
            Builtin::FormatName => {
                let format = self.pop_str(name)?;
                let n = self.pop_int(name)?;
                let names = self.pop_str(name)?;
                let list = split_name_list(&names);
                let Some(person) = usize::try_from(n)
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| list.get(i))
                else {
                    return Err(bad_argument(
                        builtin,
                        format!("no name {n} in \"{names}\" ({} names)", list.len()),
                    ));
                };
                let person = Person::parse(person)?;
                let formatted = self.name_format(&format)?.format(&person);
                self.push(StackValue::Str(formatted));
            }
            Builtin::If => {
                let else_branch = self.pop()?;
                let then_branch = self.pop()?;
                let condition = self.pop_int(name)?;
                let branch = if condition > 0 {
                    then_branch
                } else {
                    else_branch
                };
                self.execute_value(&branch, name)?;
            }
            Builtin::IntToChr => {
                let n = self.pop_int(name)?;
                let c = u32::try_from(n)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| bad_argument(builtin, format!("{n} is not a character code")))?;
                self.push(StackValue::Str(c.to_string()));
            }
            Builtin::IntToStr => {
                let n = self.pop_int(name)?;
                self.push(StackValue::Str(n.to_string()));
            }
            Builtin::Missing => {
                let missing = match self.pop()? {
                    StackValue::Missing(_) => true,
                    StackValue::Str(_) => false,
                    other => return Err(type_mismatch(name, "field", &other)),
                };
                self.push(truth(missing));
            }
            Builtin::Newline => self.newline(),
            Builtin::NumNames => {
                let names = self.pop_str(name)?;
                let count = split_name_list(&names).len();
                self.push(StackValue::Int(count as i64));
            }
            Builtin::Pop => {
                self.pop()?;
            }
            Builtin::Preamble => {
                let preamble = self.data.preamble();
                self.push(StackValue::Str(preamble));
            }
            Builtin::Purify => {
                let s = self.pop_str(name)?;
                self.push(StackValue::Str(bibtex_purify(&s)));
            }
            Builtin::Quote => self.push(StackValue::Str("\"".to_string())),
            Builtin::Skip => {}
            Builtin::Stack => {
                while let Some(value) = self.stack.pop() {
                    tracing::info!("{value}");
                }
            }
            Builtin::Substring => {
                let length = self.pop_int(name)?;
                let start = self.pop_int(name)?;
                let s = self.pop_str(name)?;
                self.push(StackValue::Str(bibtex_substring(&s, start, length)));
            }
            Builtin::Swap => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(b);
                self.push(a);
            }
            Builtin::TextLength => {
                let s = self.pop_str(name)?;
                self.push(StackValue::Int(bibtex_len(&s) as i64));
            }
            Builtin::TextPrefix => {
                let n = self.pop_int(name)?;
                let s = self.pop_str(name)?;
                let n = usize::try_from(n).unwrap_or(0);
                self.push(StackValue::Str(bibtex_prefix(&s, n)));
            }
            Builtin::Top => {
                let value = self.pop()?;
                tracing::info!("{value}");
            }
            Builtin::Type => {
                let entry_type = self.entry(name)?.entry_type.clone();
                self.push(StackValue::Str(entry_type));
            }
            Builtin::Warning => {
                let message = self.pop_str(name)?;
                self.diagnostics.report(BibTeXError::Warning(message))?;
            }
            Builtin::While => {
                let body = self.pop()?;
                let condition = self.pop()?;
                loop {
                    self.execute_value(&condition, name)?;
                    if self.pop_int(name)? <= 0 {
                        break;
                    }
                    self.execute_value(&body, name)?;
                }
            }
            Builtin::Width => {
                let s = self.pop_str(name)?;
                self.push(StackValue::Int(bibtex_width(&s)));
            }
            Builtin::Write => {
                let s = self.pop_str(name)?;
                self.write(&s);
            }
        }
        Ok(())
    }
}

fn string_value(value: StackValue, builtin: &str) -> Result<String> {
    match value {
        StackValue::Str(s) => Ok(s),
        StackValue::Missing(_) => Ok(String::new()),
        other => Err(type_mismatch(builtin, "string", &other)),
    }
}
