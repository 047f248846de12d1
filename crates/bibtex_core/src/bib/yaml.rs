/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! BibYAML: the bibliography database as a YAML document.
//!
//! ```yaml
//! entries:
//!   knuth84:
//!     type: book
//!     title: The {TeX}book
//!     author:
//!     - first: Donald
//!       middle: E.
//!       last: Knuth
//! preamble: \newcommand{\noop}[1]{}
//! ```

use serde_yaml::{Mapping, Value};

use crate::caseless::CaseInsensitiveSet;
use crate::config::Config;
use crate::database::{BibliographyData, Entry, Person};
use crate::error::{DataError, Error, Result};

const NAME_PARTS: [&str; 5] = ["first", "middle", "prelast", "last", "lineage"];

fn scalar(value: &Value, context: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(DataError::Other(format!("{context}: expected a scalar value")).into()),
    }
}

fn parse_person(value: &Value, key: &str) -> Result<Person> {
    match value {
        Value::String(name) => Ok(Person::parse(name)?),
        Value::Mapping(parts) => {
            let part = |name: &str| -> Result<String> {
                parts
                    .get(name)
                    .map_or(Ok(String::new()), |v| scalar(v, key))
            };
            Ok(Person::from_parts(
                &part("first")?,
                &part("middle")?,
                &part("prelast")?,
                &part("last")?,
                &part("lineage")?,
            ))
        }
        _ => Err(DataError::Other(format!("{key}: malformed person")).into()),
    }
}

/// Parse a BibYAML document. Keys listed in `config.person_fields` hold
/// lists of persons; every other key except `type` is a field.
pub fn parse_yaml(text: &str, config: &Config) -> Result<BibliographyData> {
    let person_fields: CaseInsensitiveSet = config.person_fields.iter().cloned().collect();
    let document: Value = serde_yaml::from_str(text)?;
    let mut data = BibliographyData::new();
    data.min_crossrefs = config.min_crossrefs;

    if let Some(preamble) = document.get("preamble") {
        data.add_to_preamble(scalar(preamble, "preamble")?);
    }
    let Some(entries) = document.get("entries") else {
        return Ok(data);
    };
    let entries = entries
        .as_mapping()
        .ok_or_else(|| DataError::Other("entries: expected a mapping".to_string()))?;

    for (key, value) in entries {
        let key = scalar(key, "entry key")?;
        let fields = value
            .as_mapping()
            .ok_or_else(|| DataError::Other(format!("{key}: expected a mapping")))?;
        let entry_type = match fields.get("type") {
            Some(t) => scalar(t, &key)?,
            None => return Err(DataError::Other(format!("{key}: missing entry type")).into()),
        };
        let mut entry = Entry::new(&entry_type);
        for (name, value) in fields {
            let name = scalar(name, &key)?;
            if name == "type" {
                continue;
            }
            if person_fields.contains(&name) {
                let persons = value
                    .as_sequence()
                    .ok_or_else(|| DataError::Other(format!("{key}: {name} must be a list")))?;
                for person in persons {
                    entry.add_person(parse_person(person, &key)?, &name);
                }
            } else {
                entry.fields.insert(name, scalar(value, &key)?);
            }
        }
        data.add_entry(key, entry).map_err(Error::from)?;
    }
    Ok(data)
}

fn person_to_yaml(person: &Person) -> Value {
    let mut map = Mapping::new();
    for (name, part) in NAME_PARTS.iter().zip([
        &person.first,
        &person.middle,
        &person.prelast,
        &person.last,
        &person.lineage,
    ]) {
        if !part.is_empty() {
            map.insert(Value::from(*name), Value::from(part.join(" ")));
        }
    }
    Value::Mapping(map)
}

/// Serialize `data` as a BibYAML document.
pub fn write_yaml(data: &BibliographyData) -> Result<String> {
    let mut entries = Mapping::new();
    for (key, entry) in data.entries.iter() {
        let mut fields = Mapping::new();
        for (name, value) in entry.fields.iter() {
            fields.insert(Value::from(name), Value::from(value.as_str()));
        }
        fields.insert(Value::from("type"), Value::from(entry.original_type.as_str()));
        for (role, persons) in entry.persons.iter() {
            let persons = persons.iter().map(person_to_yaml).collect::<Vec<_>>();
            fields.insert(Value::from(role), Value::Sequence(persons));
        }
        entries.insert(Value::from(key), Value::Mapping(fields));
    }
    let mut document = Mapping::new();
    document.insert(Value::from("entries"), Value::Mapping(entries));
    let preamble = data.preamble();
    if !preamble.is_empty() {
        document.insert(Value::from("preamble"), Value::from(preamble));
    }
    Ok(serde_yaml::to_string(&Value::Mapping(document))?)
}
