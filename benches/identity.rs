//! Benchmarks for identity derivation
//!
//! Runs once per like request; dominated by PBKDF2 rounds.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stock_price_checker::core::{IdentityHasher, IdentityParams};

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity_derive");

    for iterations in [512u32, 2048, 8192] {
        let hasher = IdentityHasher::new(IdentityParams {
            iterations,
            ..IdentityParams::default()
        })
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(iterations), &hasher, |b, hasher| {
            b.iter(|| hasher.derive(black_box("203.0.113.42")).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_derive);
criterion_main!(benches);
