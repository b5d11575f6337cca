//! Benchmarks for galaxy generation and mesh building.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galaxy_generator::galaxy::{generate, GalaxyParameters};
use galaxy_generator::graphics::build_point_cloud_mesh;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [10_000u32, 100_000, 1_000_000] {
        let params = GalaxyParameters {
            count,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &params, |b, params| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(generate(params, &mut rng).unwrap()))
        });
    }

    group.finish();
}

fn bench_mesh(c: &mut Criterion) {
    let params = GalaxyParameters::default();
    let cloud = generate(&params, &mut StdRng::seed_from_u64(7)).unwrap();

    c.bench_function("build_point_cloud_mesh/100000", |b| {
        b.iter(|| black_box(build_point_cloud_mesh(&cloud.particles)))
    });
}

criterion_group!(benches, bench_generate, bench_mesh);
criterion_main!(benches);
