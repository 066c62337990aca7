use criterion::{criterion_group, criterion_main};

mod fit;
mod harness;

criterion_group!(benches_fit, fit::bench_fit, fit::bench_constraints);
criterion_group!(benches_harness, harness::bench_harness);
criterion_main!(benches_fit, benches_harness);
