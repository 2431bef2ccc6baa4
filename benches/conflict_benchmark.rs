use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gym_tracker::services::scheduling::count_overlapping_pairs;

fn benchmark_conflict_scan(c: &mut Criterion) {
    // A dense day: back-to-back hour slots plus staggered half-hour classes,
    // the worst realistic case for one location-day group.
    let dense: Vec<(u32, u32)> = (6..22)
        .flat_map(|hour| {
            let start = hour * 60;
            [(start, start + 60), (start + 30, start + 90)]
        })
        .collect();

    // A sparse day: a handful of non-overlapping classes.
    let sparse: Vec<(u32, u32)> = (0..6).map(|i| (8 * 60 + i * 120, 8 * 60 + i * 120 + 60)).collect();

    let mut group = c.benchmark_group("conflict_scan");

    group.bench_function("dense_day", |b| {
        b.iter(|| count_overlapping_pairs(black_box(&dense)))
    });

    group.bench_function("sparse_day", |b| {
        b.iter(|| count_overlapping_pairs(black_box(&sparse)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_conflict_scan);
criterion_main!(benches);
