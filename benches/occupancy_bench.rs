use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bevy::math::{IVec2, UVec2, Vec2};
use blockwright::architect::ConstructionPipeline;
use blockwright::pool::SlotPool;
use blockwright::settings::ArchitectSettings;
use blockwright::world::{BlockGrid, BlockKind, GridShape, Rotation, TileMap, TileType};

fn bench_footprint(c: &mut Criterion) {
    let shape = GridShape::new(256, 256);
    let mut out = Vec::with_capacity(36);
    let mut group = c.benchmark_group("footprint");
    for side in [1u32, 3, 6] {
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, &side| {
            b.iter(|| {
                for rotation in [Rotation::Up, Rotation::Right, Rotation::Down, Rotation::Left] {
                    black_box(shape.footprint(IVec2::new(128, 128), UVec2::splat(side), rotation, &mut out));
                }
            })
        });
    }
    group.finish();
}

fn bench_pool_churn(c: &mut Criterion) {
    c.bench_function("pool_churn_1k", |b| {
        let mut pool: SlotPool<u64> = SlotPool::new(1024);
        let mut live = Vec::with_capacity(1024);
        b.iter(|| {
            for i in 0..1024u64 {
                if let Ok(a) = pool.create(i) {
                    live.push(a);
                }
            }
            for a in live.drain(..) {
                pool.destroy(a);
            }
        })
    });
}

fn bench_builder_scan(c: &mut Criterion) {
    let settings = ArchitectSettings {
        map_width: 256,
        map_height: 256,
        build_interval: 0.0,
        build_range: 40.0,
        ..Default::default()
    };
    let tiles = TileMap::new(256, 256, TileType::Ground);

    c.bench_function("builder_scan_sparse", |b| {
        b.iter_batched(
            || {
                let grid = BlockGrid::new(256, 256, SlotPool::new(256));
                let mut pipeline = ConstructionPipeline::new(grid.shape(), &settings);
                pipeline.select(BlockKind::Conduit, Rotation::Up);
                // a single order in the far corner of the scan square
                pipeline.commit(Vec2::new(147.5, 147.5), &grid, &tiles);
                (grid, pipeline)
            },
            |(mut grid, mut pipeline)| {
                black_box(pipeline.tick(0.016, Vec2::new(128.0, 128.0), false, &mut grid, &tiles));
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_footprint, bench_pool_churn, bench_builder_scan);
criterion_main!(benches);
