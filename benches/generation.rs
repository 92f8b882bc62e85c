//! Generation cost against point count.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use galaxy_generator::galaxy::{generate, GalaxyParameters};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for quantity in [10_000u32, 50_000, 100_000] {
        let params = GalaxyParameters {
            quantity,
            ..Default::default()
        };
        group.throughput(Throughput::Elements(quantity.into()));
        group.bench_with_input(BenchmarkId::from_parameter(quantity), &params, |b, params| {
            b.iter(|| generate(black_box(params)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
