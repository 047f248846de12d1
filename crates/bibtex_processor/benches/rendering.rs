use bibtex_core::config::{LabelStyle, SortingStyle};
use bibtex_core::{parse_bib_str, BibliographyData, Config, Diagnostics};
use bibtex_processor::{format_bibliography, run_bst, BibSource, BstProgram};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[path = "../tests/common/mod.rs"]
mod common;

/// The fixture database repeated `copies` times under fresh keys.
fn database(copies: usize) -> BibliographyData {
    let mut text = String::new();
    for i in 0..copies {
        let copy = common::MINI_BIB
            .replace("@book{", &format!("@book{{k{i}-"))
            .replace("@article{", &format!("@article{{k{i}-"));
        text.push_str(&copy);
    }
    // the style-defined journal macro is not known to the .bib parser
    text = text.replace("journal = acm", "journal = \"Communications of the ACM\"");
    parse_bib_str(&text, &mut Diagnostics::default()).expect("failed to parse bench database")
}

fn bench_rendering(c: &mut Criterion) {
    let data = database(50);
    let citations = vec!["*".to_string()];
    let config = Config::default();

    c.bench_function("Parse BST (mini)", |b| {
        b.iter(|| BstProgram::parse(black_box(common::MINI_BST)).unwrap())
    });

    let program = BstProgram::parse(common::MINI_BST).expect("failed to parse mini.bst");
    c.bench_function("Run BST (mini, 200 entries)", |b| {
        b.iter(|| {
            run_bst(
                &program,
                black_box(&citations),
                BibSource::Data(data.clone()),
                &config,
            )
            .unwrap()
        })
    });

    let mut native = Config::default();
    native.native.label_style = LabelStyle::Alpha;
    native.native.sorting_style = SortingStyle::AuthorYearTitle;
    c.bench_function("Native style (alpha, 200 entries)", |b| {
        b.iter(|| format_bibliography(&data, black_box(&citations), &native).unwrap())
    });
}

criterion_group!(benches, bench_rendering);
criterion_main!(benches);
