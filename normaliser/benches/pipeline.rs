//! Benchmark for a full partition, rendezvous, transform and reassembly run.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use normaliser::{normalise, Grid, NormaliseConfig, Rgb, TransformKind};

fn test_grid(width: usize, height: usize) -> Grid {
    Grid::from_fn(width, height, |x, y| {
        Rgb::new((x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8)
    })
    .expect("benchmark grid dimensions are non-zero")
}

fn benchmarks(c: &mut Criterion) {
    let grid = test_grid(1920, 1080);
    let mut group = c.benchmark_group("normalise_1920x1080");

    for chunk_count in [2, 4, 8, 12] {
        group.bench_with_input(
            BenchmarkId::new("channel_permutation", chunk_count),
            &chunk_count,
            |b, &chunk_count| {
                let config = NormaliseConfig::new(chunk_count);
                b.iter(|| normalise(&grid, config).expect("valid chunk count"));
            },
        );
    }

    group.bench_function("linear_rescale/8", |b| {
        let config = NormaliseConfig::new(8).transform(TransformKind::LinearRescale);
        b.iter(|| normalise(&grid, config).expect("valid chunk count"));
    });

    group.finish();
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
