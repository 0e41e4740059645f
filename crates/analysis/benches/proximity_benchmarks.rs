//! Benchmarks for ranking and proximity binding.
//!
//! Run with: cargo bench --package analysis --bench proximity_benchmarks

use analysis::{rank_facilities, ProximityAggregator, ProximityPolicy, RankingMetric, Reducer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use test_utils::{generate_facilities, grid_samples};

fn bench_bind(c: &mut Criterion) {
    let facilities = generate_facilities(200, 7, (34.0, 38.0), (126.0, 129.5));
    let mut group = c.benchmark_group("proximity_bind");

    for size in [20usize, 60, 120] {
        let samples = grid_samples((33.5, 125.5), size, size, 5.0 / size as f64, |r, c| {
            ((r * 7 + c * 3) % 17) as f64
        });
        group.throughput(Throughput::Elements((facilities.len() * samples.len()) as u64));

        let by_radius =
            ProximityAggregator::new(ProximityPolicy::Radius { radius_km: 25.0 }, Reducer::Mean)
                .unwrap()
                .with_weibull(false);
        group.bench_with_input(
            BenchmarkId::new("radius_25km", samples.len()),
            &samples,
            |b, samples| b.iter(|| by_radius.bind(black_box(&facilities), black_box(samples))),
        );

        let by_k = ProximityAggregator::new(ProximityPolicy::Nearest { k: 8 }, Reducer::Median)
            .unwrap()
            .with_weibull(false);
        group.bench_with_input(
            BenchmarkId::new("nearest_8", samples.len()),
            &samples,
            |b, samples| b.iter(|| by_k.bind(black_box(&facilities), black_box(samples))),
        );
    }

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    for count in [100usize, 1_000, 10_000] {
        let facilities = generate_facilities(count, 13, (34.0, 38.0), (126.0, 129.5));
        group.bench_with_input(BenchmarkId::from_parameter(count), &facilities, |b, f| {
            b.iter(|| rank_facilities(black_box(f), RankingMetric::AnnualGeneration, 10))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bind, bench_rank);
criterion_main!(benches);
