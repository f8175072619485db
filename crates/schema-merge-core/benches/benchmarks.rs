//! Criterion benchmarks for the dialect converter and merge.
//!
//! Fixtures are pre-parsed outside the benchmark loop to measure only the
//! conversion/merge logic, not parsing or file I/O.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::Value;
use std::fs;
use std::path::Path;

use schema_merge_core::{
    convert, load_schemas, merge, DocumentFormat, MergeOptions, TargetDocument,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures");

/// Load and parse a bundle fixture.
fn load_fixture(name: &str) -> Value {
    let path = Path::new(FIXTURES_DIR).join("jsonschema").join(name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

fn bench_convert_catalog(c: &mut Criterion) {
    let bundle = load_fixture("unitycatalog.catalogs.v1.CatalogInfo.schema.strict.bundle.json");

    c.bench_function("convert/catalog_info", |b| {
        b.iter(|| convert(black_box(&bundle)))
    });
}

fn bench_merge_fixtures(c: &mut Criterion) {
    let schema_dir = Path::new(FIXTURES_DIR).join("jsonschema");
    let loaded = load_schemas(&schema_dir, &MergeOptions::default()).unwrap();
    let text = fs::read_to_string(Path::new(FIXTURES_DIR).join("openapi.yaml")).unwrap();
    let doc = TargetDocument::parse(&text, DocumentFormat::Yaml).unwrap();

    c.bench_function("merge/fixtures", |b| {
        b.iter(|| {
            let mut target = doc.clone();
            merge(black_box(&mut target), loaded.definitions()).unwrap()
        })
    });
}

criterion_group!(benches, bench_convert_catalog, bench_merge_fixtures);
criterion_main!(benches);
