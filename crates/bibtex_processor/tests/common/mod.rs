/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bibtex_core::{parse_bib_str, BibliographyData, Config, Diagnostics};
use bibtex_processor::{run_bst, BibSource, BstProgram, FormattedBibliography};

// --- Fixtures ---

/// A cut-down `plain.bst`: sorted by author, year and title, numbered
/// labels, `article` and `book` layouts.
pub const MINI_BST: &str = r#"
% mini.bst: a small numbered style
ENTRY
  { author title journal year volume pages publisher }
  {}
  { label }

INTEGERS { nameptr namesleft numnames entry.count }

STRINGS { s t }

MACRO {acm} {"Communications of the ACM"}

FUNCTION {format.names}
{ 's :=
  #1 'nameptr :=
  s num.names$ 'numnames :=
  numnames 'namesleft :=
    { namesleft #0 > }
    { s nameptr "{ff~}{vv~}{ll}{, jj}" format.name$ 't :=
      nameptr #1 >
        { namesleft #1 >
            { ", " * t * }
            { numnames #2 >
                { "," * }
                'skip$
              if$
              t "others" =
                { " et~al." * }
                { " and " * t * }
              if$
            }
          if$
        }
        't
      if$
      nameptr #1 + 'nameptr :=
      namesleft #1 - 'namesleft :=
    }
  while$
}

FUNCTION {format.authors}
{ author empty$
    { "" }
    { author format.names }
  if$
}

FUNCTION {begin.entry}
{ newline$
  "\bibitem{" write$
  cite$ write$
  "}" write$
  newline$
}

FUNCTION {article}
{ begin.entry
  format.authors add.period$ write$ newline$
  title "t" change.case$ add.period$ write$ newline$
  journal "\emph{" swap$ * "}" * ", " * volume * ":" * pages * ", " * year *
  add.period$ write$ newline$
}

FUNCTION {book}
{ begin.entry
  format.authors add.period$ write$ newline$
  "\emph{" title * "}" * add.period$ write$ newline$
  publisher ", " * year * add.period$ write$ newline$
}

FUNCTION {default.type} { book }

FUNCTION {presort}
{ author empty$
    { cite$ }
    { author #1 "{ll}" format.name$ }
  if$
  "  " * year * "  " * title *
  purify$ "l" change.case$
  'sort.key$ :=
}

FUNCTION {number.label}
{ entry.count #1 + 'entry.count :=
  entry.count int.to.str$ 'label :=
}

FUNCTION {begin.bib}
{ preamble$ empty$
    'skip$
    { preamble$ write$ newline$ }
  if$
  "\begin{thebibliography}{" entry.count int.to.str$ * "}" * write$ newline$
}

FUNCTION {end.bib}
{ newline$
  "\end{thebibliography}" write$ newline$
}

READ

ITERATE {presort}

SORT

ITERATE {number.label}

EXECUTE {begin.bib}

ITERATE {call.type$}

EXECUTE {end.bib}
"#;

/// Entries for [`MINI_BST`]; `acm` is a macro defined by the style.
pub const MINI_BIB: &str = r#"
@preamble{"\newcommand{\noopsort}[1]{}"}

@book{knuth84,
  author = "Donald E. Knuth",
  title = "The {TeX}book",
  publisher = "Addison-Wesley",
  year = 1984
}

@article{lamport78,
  author = "Leslie Lamport",
  title = "Time, Clocks, and the Ordering of Events in a Distributed System",
  journal = acm,
  volume = 21,
  pages = "558--565",
  year = 1978
}

@article{dijkstra68,
  author = "Edsger W. Dijkstra and others",
  title = "Go To Statement Considered Harmful",
  journal = acm,
  volume = 11,
  pages = "147--148",
  year = 1968
}

@book{companion,
  author = "Michel Goossens and Frank Mittelbach and Alexander Samarin",
  title = "The {LaTeX} Companion",
  publisher = "Addison-Wesley",
  year = 1994
}
"#;

/// What BibTeX writes for [`MINI_BIB`] with [`MINI_BST`], all four entries
/// cited.
pub const MINI_BBL: &str = r"\newcommand{\noopsort}[1]{}
\begin{thebibliography}{4}

\bibitem{dijkstra68}
Edsger~W. Dijkstra et~al.
Go to statement considered harmful.
\emph{Communications of the ACM}, 11:147--148, 1968.

\bibitem{companion}
Michel Goossens, Frank Mittelbach, and Alexander Samarin.
\emph{The {LaTeX} Companion}.
Addison-Wesley, 1994.

\bibitem{knuth84}
Donald~E. Knuth.
\emph{The {TeX}book}.
Addison-Wesley, 1984.

\bibitem{lamport78}
Leslie Lamport.
Time, clocks, and the ordering of events in a distributed system.
\emph{Communications of the ACM}, 21:558--565, 1978.

\end{thebibliography}
";

/// Two papers cross-referencing the same proceedings.
pub const CROSSREF_BIB: &str = r#"
@inproceedings{paper1, author = "Ann Author", title = "First", crossref = "proc"}
@inproceedings{paper2, author = "Bob Writer", title = "Second", crossref = "proc"}
@proceedings{proc, title = "Proceedings of Things", year = 2001, publisher = "P"}
"#;

/// Prints `key: title (year)` for each cited entry, in citation order.
pub const LIST_BST: &str = r#"
ENTRY { title year } { } { }
FUNCTION { show } {
    cite$ ": " * title * " (" * year * ")" * write$ newline$
}
READ
ITERATE { show }
"#;

pub const MINI_AUX: &str = r"\relax
\citation{lamport78}
\citation{knuth84}
\citation{dijkstra68,companion}
\bibstyle{mini}
\bibdata{refs}
";

// --- Helper Functions ---

pub fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|key| key.to_string()).collect()
}

pub fn parse_bib(text: &str) -> BibliographyData {
    parse_bib_str(text, &mut Diagnostics::default()).expect("fixture parses")
}

/// Run `bst` over an in-memory database.
pub fn run_style(bst: &str, bib: &str, citations: &[&str], config: &Config) -> FormattedBibliography {
    let program = BstProgram::parse(bst).expect("fixture style parses");
    run_bst(
        &program,
        &keys(citations),
        BibSource::Data(parse_bib(bib)),
        config,
    )
    .expect("style runs")
}

/// Write `files` (name, contents) into `dir` and return the path of the
/// first one.
pub fn write_project(dir: &Path, files: &[(&str, &str)]) -> PathBuf {
    for (name, contents) in files {
        fs::write(dir.join(name), contents).expect("fixture written");
    }
    dir.join(files[0].0)
}

/// The `mini` project: `paper.aux`, `mini.bst` and `refs.bib`.
pub fn write_mini_project(dir: &Path) -> PathBuf {
    write_project(
        dir,
        &[
            ("paper.aux", MINI_AUX),
            ("mini.bst", MINI_BST),
            ("refs.bib", MINI_BIB),
        ],
    )
}
