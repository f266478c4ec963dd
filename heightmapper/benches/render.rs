use criterion::{black_box, criterion_group, criterion_main, Criterion};

use heightmapper::color::ColorMap;
use heightmapper::contour::ContourClassifier;
use heightmapper::render::{render_grayscale, render_topographic};
use heightmapper::resample::resample;
use heightmapper::traversal::{BatchPlan, Traversal};
use heightmapper::HeightGrid;

/// A 500 x 500 grid of rolling hills, the size of a default download.
fn create_grid() -> HeightGrid {
    HeightGrid::from_fn(500, 500, |x, y| {
        let (fx, fy) = (x as f32 / 40.0, y as f32 / 55.0);
        600.0 + 180.0 * fx.sin() * fy.cos() + x as f32 * 0.8
    })
}

fn bench_batch_plan(c: &mut Criterion) {
    let plan = BatchPlan::new(500, 500, Traversal::Boustrophedon, 5000);

    c.bench_function("batch_plan_snake_500x500", |b| {
        b.iter(|| {
            let total: usize = plan.iter().map(|positions| positions.len()).sum();
            black_box(total);
        });
    });
}

fn bench_resample(c: &mut Criterion) {
    let grid = create_grid();

    c.bench_function("resample_x2", |b| {
        b.iter(|| black_box(resample(black_box(&grid), 2.0)));
    });
}

fn bench_grayscale(c: &mut Criterion) {
    let grid = create_grid();

    c.bench_function("render_grayscale", |b| {
        b.iter(|| black_box(render_grayscale(black_box(&grid), 1.0).unwrap()));
    });
}

fn bench_topographic(c: &mut Criterion) {
    let grid = create_grid();
    let contours = ContourClassifier::new(20.0).unwrap();
    let colors = ColorMap::default();

    c.bench_function("render_topographic_x2", |b| {
        b.iter(|| black_box(render_topographic(black_box(&grid), 2.0, &contours, &colors)));
    });
}

criterion_group!(
    benches,
    bench_batch_plan,
    bench_resample,
    bench_grayscale,
    bench_topographic
);
criterion_main!(benches);
