/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const BIB: &str = r#"@book{knuth84,
  author = "Donald E. Knuth",
  title = "The {TeX}book",
  publisher = "Addison-Wesley",
  year = 1984
}
"#;

const BST: &str = r#"
ENTRY { author title } { } { }
FUNCTION { book } {
    "\bibitem{" cite$ * "}" * write$ newline$
    author #1 "{ll}" format.name$ ". " * title * "." * write$ newline$
}
READ
ITERATE { call.type$ }
"#;

fn rbibtex(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rbibtex"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run rbibtex")
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("doc.aux"),
        "\\citation{knuth84}\n\\bibstyle{tiny}\n\\bibdata{refs}\n",
    )
    .unwrap();
    fs::write(dir.path().join("tiny.bst"), BST).unwrap();
    fs::write(dir.path().join("refs.bib"), BIB).unwrap();
    dir
}

#[test]
fn test_format_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = rbibtex(
        dir.path(),
        &["format-name", "Donald E. Knuth and Leslie Lamport", "{vv~}{ll}{, f.}", "--index", "2"],
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Lamport, L.\n");
}

#[test]
fn test_format_name_index_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let output = rbibtex(dir.path(), &["format-name", "Knuth", "{ll}", "--index", "3"]);
    assert!(!output.status.success());
}

#[test]
fn test_writes_bbl() {
    let dir = project();
    let output = rbibtex(dir.path(), &["doc.aux"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(dir.path().join("doc.bbl")).unwrap(),
        "\\bibitem{knuth84}\nKnuth. The {TeX}book.\n"
    );
}

#[test]
fn test_native_backend_from_config_file() {
    let dir = project();
    fs::write(
        dir.path().join("rbibtex.toml"),
        "style_language = \"native\"\n\n[native]\noutput_backend = \"text\"\n",
    )
    .unwrap();
    let output = rbibtex(dir.path(), &["doc.aux", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("doc.txt").exists());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["entries"][0]["key"], "knuth84");
}

#[test]
fn test_missing_aux_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = rbibtex(dir.path(), &["nothere.aux"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("rbibtex: "));
}

#[test]
fn test_convert_bib_to_yaml_and_back() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("refs.bib"), BIB).unwrap();
    let output = rbibtex(dir.path(), &["convert", "refs.bib", "refs.yaml"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let yaml = fs::read_to_string(dir.path().join("refs.yaml")).unwrap();
    assert!(yaml.contains("knuth84"));

    let output = rbibtex(dir.path(), &["convert", "refs.yaml", "copy.bib"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let bib = fs::read_to_string(dir.path().join("copy.bib")).unwrap();
    assert!(bib.contains("@book{knuth84"));
}
