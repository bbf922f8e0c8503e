use criterion::{criterion_group, criterion_main, Criterion};
use nit_data::ecs::{Component, EntityRegistry, GroupMatch};
use nit_data::pool::{Growth, IdMode, Pool};
use std::hint::black_box;

#[derive(Debug, Clone, Copy)]
struct Position(i32);
impl Component for Position {}

#[derive(Debug, Clone, Copy)]
struct RenderTag;
impl Component for RenderTag {}

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pool");

    group.bench_function("Insert 10k (growing from 16)", |b| {
        b.iter(|| {
            let mut pool = Pool::<u64>::new(16, IdMode::External, Growth::Double).unwrap();
            for id in 0..10_000u32 {
                pool.insert_with_id(id, u64::from(id)).unwrap();
            }
            black_box(pool.len());
        });
    });

    group.bench_function("Insert then delete every other id", |b| {
        b.iter(|| {
            let mut pool = Pool::<u64>::new(10_000, IdMode::External, Growth::Double).unwrap();
            for id in 0..10_000u32 {
                pool.insert_with_id(id, u64::from(id)).unwrap();
            }
            for id in (0..10_000u32).step_by(2) {
                pool.delete(id).unwrap();
            }
            black_box(pool.len());
        });
    });

    let mut pool = Pool::<u64>::new(10_000, IdMode::External, Growth::Double).unwrap();
    for id in 0..10_000u32 {
        pool.insert_with_id(id, u64::from(id)).unwrap();
    }
    group.bench_function("Dense iteration over 10k", |b| {
        b.iter(|| black_box(pool.values().iter().sum::<u64>()));
    });

    group.finish();
}

fn bench_groups(c: &mut Criterion) {
    let mut registry = EntityRegistry::default();
    registry.register_component::<Position>().unwrap();
    registry.register_component::<RenderTag>().unwrap();

    // Setup 10,000 entities, half of them renderable.
    for i in 0..10_000 {
        let entity = registry.create_entity().unwrap();
        registry.add_component(entity, Position(i)).unwrap();
        if i % 2 == 0 {
            registry.add_component(entity, RenderTag).unwrap();
        }
    }
    registry
        .create_group::<(Position, RenderTag)>(GroupMatch::Superset)
        .unwrap();

    let mut group = c.benchmark_group("ECS Groups");

    group.bench_function("Cached group iteration", |b| {
        b.iter(|| {
            let members = registry
                .group::<(Position, RenderTag)>(GroupMatch::Superset)
                .unwrap();
            let mut count = 0;
            for entity in members.iter() {
                if let Some(position) = registry.get_component::<Position>(entity) {
                    count += position.0;
                }
            }
            black_box(count);
        });
    });

    group.bench_function("Toggle a component (incremental update)", |b| {
        b.iter(|| {
            registry.remove_component::<RenderTag>(0).unwrap();
            registry.add_component(0, RenderTag).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pool, bench_groups);
criterion_main!(benches);
