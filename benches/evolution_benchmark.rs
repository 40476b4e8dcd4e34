use criterion::{criterion_group, criterion_main, Criterion};
use darwin_rockets::config::Config;
use darwin_rockets::world::World;

// A fixed seed keeps iterations comparable across runs.
fn setup_world() -> World {
    let mut config = Config::default();
    config.ga.rng_seed = Some(42);
    World::new(config).unwrap()
}

fn benchmark_generation_cycle(c: &mut Criterion) {
    let world = setup_world();

    let mut group = c.benchmark_group("World Performance");

    group.bench_function("run_one_generation", |b| {
        // `clone` resets the world state for each run.
        b.iter(|| {
            let mut cloned = world.clone();
            while cloned.tick() {}
            cloned.advance_generation();
            cloned.generation_index()
        })
    });

    group.bench_function("single_tick", |b| {
        b.iter(|| {
            let mut cloned = world.clone();
            cloned.tick()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_generation_cycle);
criterion_main!(benches);
