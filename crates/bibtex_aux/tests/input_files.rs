use std::fs;

use bibtex_aux::{parse_file, parse_file_strict, AuxError};

#[test]
fn test_input_is_resolved_beside_the_including_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("chapters")).unwrap();
    fs::write(
        dir.path().join("main.aux"),
        "\\relax\n\\citation{intro}\n\\@input{chapters/one.aux}\n\\bibstyle{alpha}\n\\bibdata{refs}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("chapters/one.aux"),
        "\\citation{Knuth84,lamport94}\n\\@writefile{toc}{\\contentsline}\n",
    )
    .unwrap();

    let aux = parse_file(dir.path().join("main.aux")).unwrap();
    assert_eq!(aux.citations, ["intro", "Knuth84", "lamport94"]);
    assert_eq!(aux.style, "alpha");
    assert_eq!(aux.data, ["refs"]);
    assert!(aux.warnings.is_empty());
}

#[test]
fn test_bibdata_may_follow_inputs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.aux"), "\\citation{x}\n").unwrap();
    fs::write(
        dir.path().join("main.aux"),
        "\\@input{a.aux}\n\\bibstyle{plain}\n\\bibdata{refs}\n",
    )
    .unwrap();
    let aux = parse_file(dir.path().join("main.aux")).unwrap();
    assert_eq!(aux.citations, ["x"]);
}

#[test]
fn test_recursive_input_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("main.aux"),
        "\\@input{main.aux}\n\\bibstyle{plain}\n\\bibdata{refs}\n",
    )
    .unwrap();
    let aux = parse_file(dir.path().join("main.aux")).unwrap();
    assert_eq!(aux.warnings.len(), 1);
    assert!(aux.warnings[0].message.starts_with(r"recursive \@input of"));
}

#[test]
fn test_recursive_input_fails_when_strict() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("main.aux"),
        "\\@input{main.aux}\n\\bibstyle{plain}\n\\bibdata{refs}\n",
    )
    .unwrap();
    let err = parse_file_strict(dir.path().join("main.aux")).unwrap_err();
    assert!(matches!(err, AuxError::Data(_)), "{err:?}");
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.aux"), "\\@input{nowhere.aux}\n").unwrap();
    let err = parse_file(dir.path().join("main.aux")).unwrap_err();
    assert!(matches!(err, AuxError::Io { .. }));
}
