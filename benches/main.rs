//! Benchmarks for the ranked skiplist, against the standard library's ordered
//! set as a baseline.

use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    ranked::insert,
    ranked::remove,
    ranked::contains,
    ranked::iter,
    ranked::uniform_vs_geometric,
    btreeset::insert,
    btreeset::contains,
    btreeset::iter,
);
criterion_main!(benches);
