/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The `.bst` stack machine.
//!
//! An [`Interpreter`] runs one [`BstProgram`] against one citation list.
//! Commands are executed in order; `READ` loads the database, `ITERATE`,
//! `REVERSE` and `SORT` walk or reorder the citations, and functions
//! manipulate a single operand stack of integers, strings and functions.
//!
//! All runtime errors are fatal. Warnings (`warning$`, missing database
//! entries, undefined entry types) go through [`Diagnostics`] and are
//! fatal only under the strict error policy.

mod builtins;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use bibtex_core::strings::{wrap, WRAP_WIDTH};
use bibtex_core::{
    BibParser, BibTeXError, BibliographyData, CaseInsensitiveMap, Config, Diagnostics, Entry,
    EntryValue, Result,
};

use crate::bibliography::{FormattedBibliography, FormattedEntry};
use crate::bst::{BstProgram, Command, Literal};
use crate::names::NameFormat;

pub use builtins::Builtin;

/// BibTeX 0.99d limits, exposed as `global.max$` and `entry.max$`.
const GLOBAL_MAX: i64 = 20000;
const ENTRY_MAX: i64 = 250;

/// Where `READ` gets the database from.
#[derive(Debug, Clone)]
pub enum BibSource {
    /// `.bib` files, parsed when `READ` runs so that the style's `MACRO`
    /// definitions are in effect.
    Files(Vec<PathBuf>),
    /// A database parsed beforehand.
    Data(BibliographyData),
}

/// A named cell in the global variable table.
#[derive(Debug, Clone)]
enum Variable {
    Integer(i64),
    String(String),
    /// Per-entry variables live in [`Entry::vars`].
    EntryInteger,
    EntryString,
    Field,
    Crossref,
    Function(Rc<[Literal]>),
    Builtin(Builtin),
}

impl Variable {
    fn kind(&self) -> &'static str {
        match self {
            Variable::Integer(_) => "global integer",
            Variable::String(_) => "global string",
            Variable::EntryInteger => "entry integer",
            Variable::EntryString => "entry string",
            Variable::Field | Variable::Crossref => "field",
            Variable::Function(_) => "function",
            Variable::Builtin(_) => "built-in function",
        }
    }
}

/// A value on the operand stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackValue {
    Int(i64),
    Str(String),
    /// The value of an absent field. Reads as the empty string, but
    /// `missing$` can tell it apart.
    Missing(String),
    /// An anonymous function pushed by a `{ ... }` literal.
    Function(Rc<[Literal]>),
    /// A variable or function pushed by a `'name` literal.
    Var(String),
}

impl StackValue {
    fn type_name(&self) -> String {
        match self {
            StackValue::Int(n) => format!("integer {n}"),
            StackValue::Str(s) => format!("string \"{s}\""),
            StackValue::Missing(name) => format!("missing field {name}"),
            StackValue::Function(_) => "function".to_string(),
            StackValue::Var(name) => format!("variable {name}"),
        }
    }
}

impl fmt::Display for StackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackValue::Int(n) => write!(f, "{n}"),
            StackValue::Str(s) => write!(f, "\"{s}\""),
            StackValue::Missing(name) => write!(f, "<missing {name}>"),
            StackValue::Function(body) => write!(f, "{}", Literal::Function(Rc::clone(body))),
            StackValue::Var(name) => write!(f, "'{name}"),
        }
    }
}

pub struct Interpreter {
    config: Config,
    diagnostics: Diagnostics,
    vars: CaseInsensitiveMap<Variable>,
    /// `MACRO` definitions, handed to the `.bib` parser by `READ`.
    macros: CaseInsensitiveMap<String>,
    stack: Vec<StackValue>,
    source: Option<BibSource>,
    data: BibliographyData,
    citations: Vec<String>,
    current_entry: Option<String>,
    output_buffer: String,
    output: String,
    /// Finished lines written while each entry was current.
    entry_output: CaseInsensitiveMap<String>,
    name_formats: HashMap<String, NameFormat>,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("stack", &self.stack)
            .field("citations", &self.citations)
            .field("current_entry", &self.current_entry)
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    pub fn new(config: &Config) -> Self {
        let mut vars = CaseInsensitiveMap::new();
        for (name, builtin) in Builtin::ALL {
            vars.insert(name, Variable::Builtin(builtin));
        }
        vars.insert("global.max$", Variable::Integer(GLOBAL_MAX));
        vars.insert("entry.max$", Variable::Integer(ENTRY_MAX));
        vars.insert("sort.key$", Variable::EntryString);
        Self {
            config: config.clone(),
            diagnostics: Diagnostics::new(config.error_policy()),
            vars,
            macros: CaseInsensitiveMap::new(),
            stack: Vec::new(),
            source: None,
            data: BibliographyData::new(),
            citations: Vec::new(),
            current_entry: None,
            output_buffer: String::new(),
            output: String::new(),
            entry_output: CaseInsensitiveMap::new(),
            name_formats: HashMap::new(),
        }
    }

    /// Run `program` for `citations`. The interpreter is used up: a
    /// second citation list needs a fresh instance.
    pub fn run(
        mut self,
        program: &BstProgram,
        citations: &[String],
        source: BibSource,
    ) -> Result<FormattedBibliography> {
        self.citations = citations.to_vec();
        self.source = Some(source);
        for command in &program.commands {
            tracing::debug!(command = command.name(), "executing BST command");
            self.execute_command(command)?;
        }
        if !self.output_buffer.is_empty() {
            self.newline();
        }
        Ok(self.finish())
    }

    fn finish(mut self) -> FormattedBibliography {
        let entries = self
            .citations
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let label = match self.data.get(key).and_then(|e| e.vars.get("label")) {
                    Some(EntryValue::String(label)) if !label.is_empty() => label.clone(),
                    _ => (i + 1).to_string(),
                };
                let text = self
                    .entry_output
                    .get(key)
                    .map(|text| text.trim().to_string())
                    .unwrap_or_default();
                FormattedEntry {
                    key: key.clone(),
                    label,
                    text,
                }
            })
            .collect();
        FormattedBibliography {
            entries,
            text: self.output,
            warnings: self.diagnostics.take_warnings(),
        }
    }

    fn execute_command(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Entry {
                fields,
                integers,
                strings,
            } => {
                for name in fields {
                    self.add_variable(name, Variable::Field)?;
                }
                self.add_variable("crossref", Variable::Crossref)?;
                for name in integers {
                    self.add_variable(name, Variable::EntryInteger)?;
                }
                for name in strings {
                    self.add_variable(name, Variable::EntryString)?;
                }
            }
            Command::Execute(name) => self.execute_var(name)?,
            Command::Function { name, body } => {
                self.add_variable(name, Variable::Function(Rc::clone(body)))?;
            }
            Command::Integers(names) => {
                for name in names {
                    self.vars.insert(name.as_str(), Variable::Integer(0));
                }
            }
            Command::Iterate(name) => self.iterate(name, false)?,
            Command::Macro { name, value } => {
                self.macros.insert(name.as_str(), value.clone());
            }
            Command::Read => self.read()?,
            Command::Reverse(name) => self.iterate(name, true)?,
            Command::Sort => self.sort(),
            Command::Strings(names) => {
                for name in names {
                    self.vars.insert(name.as_str(), Variable::String(String::new()));
                }
            }
        }
        Ok(())
    }

    fn add_variable(&mut self, name: &str, value: Variable) -> Result<()> {
        if self.vars.contains_key(name) {
            return Err(BibTeXError::AlreadyDeclared(name.to_string()).into());
        }
        self.vars.insert(name, value);
        Ok(())
    }

    /// Load the database, add crossref'd entries to the citations and
    /// drop citations that have no entry.
    fn read(&mut self) -> Result<()> {
        let Some(source) = self.source.take() else {
            return Err(BibTeXError::BadArgument {
                builtin: "READ".to_string(),
                message: "the database has already been read".to_string(),
            }
            .into());
        };
        let min_crossrefs = self.config.min_crossrefs;
        self.data = match source {
            BibSource::Files(paths) => {
                let mut parser = BibParser::new(&self.config);
                parser.set_person_fields(std::iter::empty::<String>());
                for (name, value) in self.macros.iter() {
                    parser.define_macro(name, value.as_str());
                }
                let mut data =
                    BibliographyData::with_wanted_entries(self.citations.iter().cloned(), min_crossrefs);
                for path in &paths {
                    parser.parse_file(path, self.config.bib_encoding, &mut data, &mut self.diagnostics)?;
                }
                data
            }
            BibSource::Data(data) => data,
        };
        let citations =
            self.data
                .add_extra_citations(&self.citations, min_crossrefs, &mut self.diagnostics)?;
        self.citations = Vec::with_capacity(citations.len());
        for citation in citations {
            if self.data.get(&citation).is_some() {
                self.citations.push(citation);
            } else {
                self.diagnostics.report(BibTeXError::MissingEntry(citation))?;
            }
        }
        Ok(())
    }

    fn iterate(&mut self, function: &str, reverse: bool) -> Result<()> {
        if !self.vars.contains_key(function) {
            return Err(BibTeXError::UndefinedFunction(function.to_string()).into());
        }
        let mut citations = self.citations.clone();
        if reverse {
            citations.reverse();
        }
        for key in citations {
            self.current_entry = Some(key);
            self.execute_var(function)?;
        }
        self.current_entry = None;
        Ok(())
    }

    /// Stable sort by each entry's `sort.key$`.
    fn sort(&mut self) {
        let data = &self.data;
        self.citations.sort_by_cached_key(|key| {
            match data.get(key).and_then(|e| e.vars.get("sort.key$")) {
                Some(EntryValue::String(s)) => s.clone(),
                _ => String::new(),
            }
        });
    }

    fn push(&mut self, value: StackValue) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Result<StackValue> {
        self.stack
            .pop()
            .ok_or_else(|| BibTeXError::StackUnderflow.into())
    }

    fn pop_int(&mut self, builtin: &str) -> Result<i64> {
        match self.pop()? {
            StackValue::Int(n) => Ok(n),
            other => Err(type_mismatch(builtin, "integer", &other)),
        }
    }

    /// Pop a string; a missing field reads as `""`.
    fn pop_str(&mut self, builtin: &str) -> Result<String> {
        match self.pop()? {
            StackValue::Str(s) => Ok(s),
            StackValue::Missing(_) => Ok(String::new()),
            other => Err(type_mismatch(builtin, "string", &other)),
        }
    }

    fn run_body(&mut self, body: &[Literal]) -> Result<()> {
        for literal in body {
            self.execute_literal(literal)?;
        }
        Ok(())
    }

    fn execute_literal(&mut self, literal: &Literal) -> Result<()> {
        match literal {
            Literal::Str(s) => self.push(StackValue::Str(s.clone())),
            Literal::Int(n) => self.push(StackValue::Int(*n)),
            Literal::Identifier(name) => self.execute_var(name)?,
            Literal::QuotedVar(name) => {
                if !self.vars.contains_key(name) {
                    return Err(BibTeXError::UndefinedVariable(name.clone()).into());
                }
                self.push(StackValue::Var(name.clone()));
            }
            Literal::Function(body) => self.push(StackValue::Function(Rc::clone(body))),
        }
        Ok(())
    }

    /// Execute a function value popped by `if$`, `while$` and friends.
    fn execute_value(&mut self, value: &StackValue, builtin: &str) -> Result<()> {
        match value {
            StackValue::Function(body) => self.run_body(body),
            StackValue::Var(name) => self.execute_var(name),
            other => Err(type_mismatch(builtin, "function", other)),
        }
    }

    /// Execute a named variable: functions run, other variables push
    /// their value.
    fn execute_var(&mut self, name: &str) -> Result<()> {
        let Some(var) = self.vars.get(name) else {
            return Err(BibTeXError::UndefinedFunction(name.to_string()).into());
        };
        match var {
            Variable::Integer(n) => {
                let n = *n;
                self.push(StackValue::Int(n));
            }
            Variable::String(s) => {
                let s = s.clone();
                self.push(StackValue::Str(s));
            }
            Variable::EntryInteger => {
                let n = match self.entry(name)?.vars.get(&name.to_lowercase()) {
                    Some(EntryValue::Integer(n)) => *n,
                    _ => 0,
                };
                self.push(StackValue::Int(n));
            }
            Variable::EntryString => {
                let s = match self.entry(name)?.vars.get(&name.to_lowercase()) {
                    Some(EntryValue::String(s)) => s.clone(),
                    _ => String::new(),
                };
                self.push(StackValue::Str(s));
            }
            Variable::Field => {
                let entry = self.entry(name)?;
                let value = match self.data.field(entry, name) {
                    Some(value) => StackValue::Str(value.into_owned()),
                    None => StackValue::Missing(name.to_string()),
                };
                self.push(value);
            }
            Variable::Crossref => {
                let entry = self.entry(name)?;
                let value = match entry.crossref() {
                    Some(target) => StackValue::Str(target.to_string()),
                    None => StackValue::Missing("crossref".to_string()),
                };
                self.push(value);
            }
            Variable::Function(body) => {
                let body = Rc::clone(body);
                self.run_body(&body)?;
            }
            Variable::Builtin(builtin) => {
                let builtin = *builtin;
                self.call_builtin(builtin)?;
            }
        }
        Ok(())
    }

    /// `value 'name :=`
    fn assign(&mut self, name: &str, value: StackValue) -> Result<()> {
        let Some(var) = self.vars.get_mut(name) else {
            return Err(BibTeXError::UndefinedVariable(name.to_string()).into());
        };
        match var {
            Variable::Integer(slot) => match value {
                StackValue::Int(n) => *slot = n,
                other => return Err(type_mismatch(":=", "integer", &other)),
            },
            Variable::String(slot) => match value {
                StackValue::Str(s) => *slot = s,
                StackValue::Missing(_) => slot.clear(),
                other => return Err(type_mismatch(":=", "string", &other)),
            },
            Variable::EntryInteger => {
                let StackValue::Int(n) = value else {
                    return Err(type_mismatch(":=", "integer", &value));
                };
                self.set_entry_var(name, EntryValue::Integer(n))?;
            }
            Variable::EntryString => {
                let s = match value {
                    StackValue::Str(s) => s,
                    StackValue::Missing(_) => String::new(),
                    other => return Err(type_mismatch(":=", "string", &other)),
                };
                self.set_entry_var(name, EntryValue::String(s))?;
            }
            other => {
                return Err(BibTeXError::NotAssignable(format!("{} {name}", other.kind())).into())
            }
        }
        Ok(())
    }

    fn set_entry_var(&mut self, name: &str, value: EntryValue) -> Result<()> {
        self.entry_mut(name)?.vars.insert(name.to_lowercase(), value);
        Ok(())
    }

    fn current_key(&self, builtin: &str) -> Result<&str> {
        self.current_entry
            .as_deref()
            .ok_or_else(|| BibTeXError::NoCurrentEntry(builtin.to_string()).into())
    }

    fn entry(&self, builtin: &str) -> Result<&Entry> {
        let key = self.current_key(builtin)?;
        self.data
            .get(key)
            .ok_or_else(|| BibTeXError::MissingEntry(key.to_string()).into())
    }

    fn entry_mut(&mut self, builtin: &str) -> Result<&mut Entry> {
        let key = self
            .current_entry
            .as_deref()
            .ok_or_else(|| BibTeXError::NoCurrentEntry(builtin.to_string()))?;
        match self.data.get_mut(key) {
            Some(entry) => Ok(entry),
            None => Err(BibTeXError::MissingEntry(key.to_string()).into()),
        }
    }

    fn write(&mut self, s: &str) {
        self.output_buffer.push_str(s);
    }

    /// Flush the output buffer as one wrapped line.
    fn newline(&mut self) {
        let mut line = wrap(&self.output_buffer, WRAP_WIDTH);
        self.output_buffer.clear();
        line.push('\n');
        if let Some(key) = &self.current_entry {
            self.entry_output
                .get_or_insert_with(key, String::new)
                .push_str(&line);
        }
        self.output.push_str(&line);
    }

    fn name_format(&mut self, format: &str) -> Result<&NameFormat> {
        if !self.name_formats.contains_key(format) {
            let parsed = NameFormat::parse(format)?;
            self.name_formats.insert(format.to_string(), parsed);
        }
        self.name_formats.get(format).ok_or_else(|| {
            BibTeXError::BadArgument {
                builtin: "format.name$".to_string(),
                message: format!("bad name format \"{format}\""),
            }
            .into()
        })
    }
}

fn type_mismatch(builtin: &str, expected: &'static str, found: &StackValue) -> bibtex_core::Error {
    BibTeXError::TypeMismatch {
        builtin: builtin.to_string(),
        expected,
        found: found.type_name(),
    }
    .into()
}
