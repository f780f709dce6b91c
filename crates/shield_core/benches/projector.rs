//! Projector benchmarks for shield_core.
//!
//! Run with: `cargo bench -p shield_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use shield_core::prelude::*;

fn barrage(count: usize) -> ProjectileSet {
    (0..count)
        .map(|i| {
            let angle = i as f32 * 0.37;
            let reach = (i % 90) as f32;
            Projectile::new(
                Vec2::new(angle.cos() * reach, angle.sin() * reach),
                Team::CRUX,
                1.0,
            )
        })
        .collect()
}

fn running_projector() -> ShieldSimulation {
    let config = ShieldConfig {
        breakage: 1.0e9,
        ..ShieldConfig::default()
    };
    let mut sim = ShieldSimulation::new();
    let id = sim.spawn(config, Vec2::ZERO, Team::SHARDED);
    sim.set_cheat(id, true).expect("projector just spawned");
    let mut empty = ProjectileSet::new();
    for _ in 0..120 {
        sim.tick(&mut empty);
    }
    sim
}

/// Runs projector benchmarks for the shield_core crate.
pub fn projector_benchmark(c: &mut Criterion) {
    let sim = running_projector();

    c.bench_function("tick_idle", |b| {
        b.iter_batched(
            || (sim.clone(), ProjectileSet::new()),
            |(mut sim, mut projectiles)| black_box(sim.tick(&mut projectiles)),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("tick_barrage_1000", |b| {
        b.iter_batched(
            || (sim.clone(), barrage(1000)),
            |(mut sim, mut projectiles)| black_box(sim.tick(&mut projectiles)),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("inside_hexagon", |b| {
        b.iter(|| {
            shield_core::geometry::inside_hexagon(
                black_box(Vec2::new(40.0, 30.0)),
                Vec2::ZERO,
                black_box(200.0),
            )
        });
    });
}

criterion_group!(benches, projector_benchmark);
criterion_main!(benches);
