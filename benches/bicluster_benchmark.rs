//! Pipeline benchmarks on synthetic planted matrices.
//!
//! Run with: cargo bench --bench bicluster_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fast_bicluster::{BiclusterPipeline, Params};
use ndarray::Array2;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

/// Uniform noise with `n_blocks` planted row/column blocks of strongly
/// ordered values.
fn create_planted_matrix(n_rows: usize, n_cols: usize, n_blocks: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut matrix = Array2::random_using((n_rows, n_cols), Uniform::new(0.0, 1.0), &mut rng);

    let rows_per_block = n_rows / (2 * n_blocks);
    let cols_per_block = n_cols / (2 * n_blocks);
    for block in 0..n_blocks {
        let row_start = block * rows_per_block;
        let col_start = block * cols_per_block;
        for row in row_start..row_start + rows_per_block {
            for (offset, col) in (col_start..col_start + cols_per_block).enumerate() {
                matrix[[row, col]] = 50.0 + 10.0 * offset as f64;
            }
        }
    }
    matrix
}

fn bench_pipeline_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for &rows in &[60usize, 120, 240] {
        let matrix = create_planted_matrix(rows, 40, 2);
        group.bench_with_input(BenchmarkId::new("run", rows), &matrix, |b, m| {
            let pipeline = BiclusterPipeline::builder()
                .with_params(Params::new(0.85, 0.0, 1.0, 20, 0).unwrap())
                .collect_stats(false)
                .build()
                .unwrap();
            b.iter(|| black_box(pipeline.run(m).unwrap()));
        });
    }
    group.finish();
}

fn bench_seed_retention_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("seed_retention");
    let matrix = create_planted_matrix(120, 40, 2);
    for (label, use_heap) in [("heap", true), ("sort", false)] {
        group.bench_with_input(BenchmarkId::new(label, 120), &matrix, |b, m| {
            let pipeline = BiclusterPipeline::builder()
                .with_params(Params::new(0.85, 0.0, 1.0, 20, 0).unwrap())
                .use_fib_heap(use_heap)
                .collect_stats(false)
                .build()
                .unwrap();
            b.iter(|| black_box(pipeline.run(m).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline_sizes, bench_seed_retention_modes);
criterion_main!(benches);
