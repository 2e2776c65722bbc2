//! Benchmarks for polygon collision and tile map hitbox queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tilecollide::tilemap::{EditableTileMap, TileDefinition, TransformedCollisionTileMap};
use tilecollide::{collision_test, raycast_test, Affine2, Point2, Polygon, Vec2};

/// Generates a regular convex polygon.
fn regular_polygon(sides: usize, radius: f64, cx: f64, cy: f64) -> Polygon<f64> {
    let vertices = (0..sides)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / sides as f64;
            Point2::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();
    Polygon::new(vertices)
}

/// Generates a square map where every other tile is solid.
fn checkerboard_map(dimension: usize) -> EditableTileMap<f64> {
    let mut map = EditableTileMap::new(16.0, 16.0, dimension, dimension);
    map.add_tile_definition(
        1,
        TileDefinition::with_hit_box(
            "solid",
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(16.0, 0.0),
                Point2::new(16.0, 16.0),
                Point2::new(0.0, 16.0),
            ],
        ),
    );
    let layer = map.add_tile_layer(0);
    for y in 0..dimension {
        for x in 0..dimension {
            if (x + y) % 2 == 0 {
                layer.set_tile(x, y, 1);
            }
        }
    }
    map
}

fn bench_collision_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_test");

    for sides in [4, 8, 16, 32] {
        let a = regular_polygon(sides, 10.0, 0.0, 0.0);
        let overlapping = regular_polygon(sides, 10.0, 15.0, 3.0);
        let separated = regular_polygon(sides, 10.0, 25.0, 0.0);

        group.bench_with_input(BenchmarkId::new("overlapping", sides), &sides, |b, _| {
            b.iter(|| collision_test(black_box(&a), black_box(&overlapping), false))
        });
        group.bench_with_input(BenchmarkId::new("separated", sides), &sides, |b, _| {
            b.iter(|| collision_test(black_box(&a), black_box(&separated), false))
        });
    }

    group.finish();
}

fn bench_raycast_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast_test");

    for sides in [4, 16, 64] {
        let polygon = regular_polygon(sides, 10.0, 0.0, 0.0);
        group.bench_with_input(BenchmarkId::new("through", sides), &polygon, |b, p| {
            b.iter(|| {
                raycast_test(
                    black_box(p),
                    black_box(Point2::new(-20.0, 1.0)),
                    black_box(Point2::new(20.0, -1.0)),
                )
            })
        });
    }

    group.finish();
}

fn bench_hitboxes_after_invalidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("hitboxes_after_invalidate");

    for dimension in [16, 64, 256] {
        let map = checkerboard_map(dimension);
        let mut collision_map = TransformedCollisionTileMap::new(&map).unwrap();
        let mut offset = 0.0;

        // A 4x4 tile query: the cost must not depend on the map size.
        group.throughput(Throughput::Elements(16));
        group.bench_function(BenchmarkId::new("query_4x4", dimension), |b| {
            b.iter(|| {
                offset += 1.0;
                collision_map
                    .set_transformation(Affine2::translation(Vec2::new(offset, 0.0)))
                    .unwrap();
                collision_map
                    .hitboxes_around("solid", offset, 0.0, offset + 63.0, 63.0)
                    .map(|polygon| polygon.center().x)
                    .sum::<f64>()
            })
        });
    }

    group.finish();
}

fn bench_hitboxes_cached(c: &mut Criterion) {
    let map = checkerboard_map(64);
    let mut collision_map = TransformedCollisionTileMap::new(&map).unwrap();
    collision_map
        .set_transformation(Affine2::rotation_around(0.3, Point2::new(512.0, 512.0)))
        .unwrap();

    c.bench_function("hitboxes_cached_rotated", |b| {
        b.iter(|| {
            collision_map
                .hitboxes_around("solid", black_box(400.0), 400.0, 600.0, 600.0)
                .count()
        })
    });
}

criterion_group!(
    benches,
    bench_collision_test,
    bench_raycast_test,
    bench_hitboxes_after_invalidate,
    bench_hitboxes_cached
);
criterion_main!(benches);
