/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

mod common;
use common::*;

use bibtex_core::{BibTeXError, Config, Error};
use bibtex_processor::{run_bst, BibSource, BstProgram};

fn run_mini(citations: &[&str]) -> bibtex_processor::FormattedBibliography {
    let dir = tempfile::tempdir().unwrap();
    let bib = write_project(dir.path(), &[("refs.bib", MINI_BIB)]);
    let program = BstProgram::parse(MINI_BST).unwrap();
    run_bst(
        &program,
        &keys(citations),
        BibSource::Files(vec![bib]),
        &Config::default(),
    )
    .unwrap()
}

#[test]
fn test_sorted_bbl_matches_bibtex() {
    let result = run_mini(&["lamport78", "knuth84", "dijkstra68", "companion"]);
    assert_eq!(result.text, MINI_BBL);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn test_entries_follow_sorted_order_with_labels() {
    let result = run_mini(&["lamport78", "knuth84", "dijkstra68", "companion"]);
    let labels: Vec<_> = result
        .entries
        .iter()
        .map(|e| (e.key.as_str(), e.label.as_str()))
        .collect();
    assert_eq!(
        labels,
        [
            ("dijkstra68", "1"),
            ("companion", "2"),
            ("knuth84", "3"),
            ("lamport78", "4"),
        ]
    );
    assert_eq!(
        result.get("knuth84").unwrap().text,
        "\\bibitem{knuth84}\nDonald~E. Knuth.\n\\emph{The {TeX}book}.\nAddison-Wesley, 1984."
    );
}

#[test]
fn test_wildcard_cites_every_entry() {
    let result = run_mini(&["*"]);
    assert_eq!(result.text, MINI_BBL);
}

#[test]
fn test_citation_keys_are_case_insensitive() {
    let result = run_mini(&["Knuth84"]);
    assert_eq!(result.len(), 1);
    assert!(result.text.contains("The {TeX}book"));
}

#[test]
fn test_missing_entry_is_a_warning() {
    let result = run_mini(&["knuth84", "nobody99"]);
    assert_eq!(result.keys().collect::<Vec<_>>(), ["knuth84"]);
    assert_eq!(result.warnings, ["missing database entry for \"nobody99\""]);
}

#[test]
fn test_missing_entry_fails_in_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    let bib = write_project(dir.path(), &[("refs.bib", MINI_BIB)]);
    let program = BstProgram::parse(MINI_BST).unwrap();
    let config = Config {
        strict: true,
        ..Config::default()
    };
    let err = run_bst(
        &program,
        &keys(&["nobody99"]),
        BibSource::Files(vec![bib]),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Runtime(BibTeXError::MissingEntry(ref key)) if key == "nobody99"));
}

#[test]
fn test_crossref_fields_are_inherited() {
    let config = Config {
        min_crossrefs: 3,
        ..Config::default()
    };
    let result = run_style(LIST_BST, CROSSREF_BIB, &["paper1", "paper2"], &config);
    assert_eq!(result.text, "paper1: First (2001)\npaper2: Second (2001)\n");
}

#[test]
fn test_crossref_target_added_after_min_crossrefs() {
    let result = run_style(
        LIST_BST,
        CROSSREF_BIB,
        &["paper1", "paper2"],
        &Config::default(),
    );
    assert_eq!(
        result.text,
        "paper1: First (2001)\npaper2: Second (2001)\nproc: Proceedings of Things (2001)\n"
    );
}

#[test]
fn test_long_lines_are_wrapped() {
    let bst = r#"
        ENTRY { title } { } { }
        FUNCTION { show } { title write$ newline$ }
        READ
        ITERATE { show }
    "#;
    let title = "word ".repeat(30);
    let bib = format!("@misc{{long, title = {{{}}}}}", title.trim_end());
    let result = run_style(bst, &bib, &["long"], &Config::default());
    let lines: Vec<&str> = result.text.lines().collect();
    assert!(lines.len() > 1);
    assert!(lines.iter().all(|line| line.chars().count() <= 79));
    assert!(lines[1..].iter().all(|line| line.starts_with("  ")));
}

#[test]
fn test_undefined_function_is_an_error() {
    let bst = "ENTRY { } { } { } READ EXECUTE { nosuch.function }";
    let program = BstProgram::parse(bst).unwrap();
    let err = run_bst(
        &program,
        &[],
        BibSource::Data(parse_bib("")),
        &Config::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "can not execute undefined function nosuch.function"
    );
}

#[test]
fn test_warning_builtin_is_collected() {
    let bst = r#"
        ENTRY { title } { } { }
        FUNCTION { check } {
            title empty$ { "empty title in " cite$ * warning$ } 'skip$ if$
        }
        READ
        ITERATE { check }
    "#;
    let result = run_style(
        bst,
        "@misc{a, title = {A}} @misc{b, note = {no title}}",
        &["a", "b"],
        &Config::default(),
    );
    assert_eq!(result.warnings, ["empty title in b"]);
}
