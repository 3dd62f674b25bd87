use bevy_ecs::world::World;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_bridge::filter::encode;
use particle_bridge::*;
use std::hint::black_box;

const HIT: EventDescriptor = EventDescriptor::from_name("hit");

fn prepare_world(body_count: usize, worker_count: usize) -> (PhysicsModule, World) {
    let config = SceneConfig::default().with_worker_count(worker_count);
    let mut module = PhysicsModule::load(config).expect("default config loads");
    let mut world = World::new();
    world.spawn((Position::default(), StaticBody));
    for i in 0..body_count {
        let x = (i % 16) as f32 * 0.5;
        let z = (i / 16) as f32 * 0.5;
        let position = Position::new(x, 0.5 + (i % 3) as f32, z);
        let mut entity = world.spawn((position, DynamicBody::new(1.0)));
        if i % 4 == 0 {
            entity.insert(CollisionSensor::new(HIT));
        }
    }
    let mut events = EventBuffer::new();
    module.run_frame(&mut world, &mut events);
    (module, world)
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_frame");
    for &count in &[128usize, 512] {
        group.bench_with_input(BenchmarkId::new("inline", count), &count, |b, &count| {
            let (mut module, mut world) = prepare_world(count, 0);
            let mut events = EventBuffer::new();
            b.iter(|| {
                black_box(module.run_frame(&mut world, &mut events));
                events.drain();
            })
        });
        group.bench_with_input(BenchmarkId::new("pool", count), &count, |b, &count| {
            let (mut module, mut world) = prepare_world(count, 4);
            let mut events = EventBuffer::new();
            b.iter(|| {
                black_box(module.run_frame(&mut world, &mut events));
                events.drain();
            })
        });
    }
    group.finish();
}

fn bench_filter_shader(c: &mut Criterion) {
    let a = encode(0b001, 0b111, Capabilities::ENABLED | Capabilities::COLLIDES);
    let b = encode(
        0b010,
        0b111,
        Capabilities::ENABLED | Capabilities::COLLIDES | Capabilities::SENSOR,
    );
    c.bench_function("contact_report_filter_shader", |bench| {
        bench.iter(|| {
            contact_report_filter_shader(
                black_box(FilterObjectAttributes::STATIC),
                black_box(a),
                black_box(FilterObjectAttributes::DYNAMIC),
                black_box(b),
            )
        })
    });
}

criterion_group!(benches, bench_frame, bench_filter_shader);
criterion_main!(benches);
