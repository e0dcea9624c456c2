use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hpoa::{Categorizer, Ontology, OntologyAccess, PHENOTYPIC_ABNORMALITY};

const TERMS: [&str; 6] = [
    "HP:0001297",
    "HP:0001631",
    "HP:0001250",
    "HP:0000077",
    "HP:0003593",
    "HP:0000007",
];

fn ancestors(ontology: &Ontology) -> usize {
    TERMS
        .iter()
        .map(|term| ontology.ancestors(term, true).len())
        .sum()
}

fn categorize<O: OntologyAccess>(categorizer: &Categorizer<O>) -> usize {
    TERMS
        .iter()
        .map(|term| categorizer.categorize(term, PHENOTYPIC_ABNORMALITY).len())
        .sum()
}

fn ancestors_benchmark(c: &mut Criterion) {
    let ontology = Ontology::from_obo_file("tests/example.obo").expect("example ontology");

    c.bench_function("ancestors", |b| b.iter(|| ancestors(black_box(&ontology))));
}

fn categorize_benchmark(c: &mut Criterion) {
    let ontology = Ontology::from_obo_file("tests/example.obo").expect("example ontology");
    let categorizer = Categorizer::new(ontology);

    c.bench_function("categorize cached", |b| {
        b.iter(|| categorize(black_box(&categorizer)))
    });

    c.bench_function("categorize cold", |b| {
        b.iter(|| {
            categorizer.cache().clear();
            categorize(black_box(&categorizer))
        })
    });
}

fn build_ontology_benchmark(c: &mut Criterion) {
    let content = std::fs::read_to_string("tests/example.obo").expect("example.obo cannot be read");
    c.bench_function("build ontology", |b| {
        b.iter(|| {
            Ontology::from_obo_str(black_box(&content))
                .expect("requires valid OBO")
                .len()
        })
    });
}

criterion_group! {
    name = category;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = ancestors_benchmark, categorize_benchmark, build_ontology_benchmark
}
criterion_main!(category);
