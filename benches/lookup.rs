use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hpoa::{AnnotationStore, Ontology, StoreConfig};

fn store() -> AnnotationStore {
    simple_logger::init_with_env().ok();
    let store = AnnotationStore::open(StoreConfig::default()).expect("in-memory database");
    store
        .load(Some(Path::new("tests/phenotype.hpoa")))
        .expect("fixture dataset");
    store
}

fn load_benchmark(c: &mut Criterion) {
    let store = store();
    let text = std::fs::read_to_string("tests/phenotype.hpoa").expect("fixture dataset");

    c.bench_function("load", |b| {
        b.iter(|| store.load_from_str(black_box(&text)).expect("valid dataset").rows)
    });
}

fn filter_benchmark(c: &mut Criterion) {
    let store = store();
    let ontology = Ontology::from_obo_file("tests/example.obo").expect("example ontology");

    c.bench_function("filter disease id", |b| {
        b.iter(|| store.filter_by_disease(black_box("OMIM:301500")).unwrap().len())
    });
    c.bench_function("filter disease label", |b| {
        b.iter(|| store.filter_by_disease(black_box("fabry")).unwrap().len())
    });
    c.bench_function("filter citation", |b| {
        b.iter(|| store.filter_by_citation(black_box("PMID:2222")).unwrap().len())
    });
    c.bench_function("filter phenotype label", |b| {
        b.iter(|| {
            store
                .filter_by_phenotype(black_box("seizure"), &ontology)
                .unwrap()
                .len()
        })
    });
}

criterion_group!(lookup, load_benchmark, filter_benchmark);
criterion_main!(lookup);
