//! End-to-end shield scenarios.
//!
//! These drive a projector through the public API the way the block
//! update loop would: charge, update, read results.

use shield_core::prelude::*;
use shield_test_utils::fixtures::{
    default_config, healthy_projector, hostile, sturdy_config, volley, ScriptedConsumers,
};

struct World {
    projector: ForceProjector,
    consumers: ScriptedConsumers,
    projectiles: ProjectileSet,
    proxies: ProxyArena,
    cheat: bool,
}

impl World {
    fn new(projector: ForceProjector) -> Self {
        let capacity = projector.config().item_capacity;
        Self {
            projector,
            consumers: ScriptedConsumers::new(capacity),
            projectiles: ProjectileSet::new(),
            proxies: ProxyArena::new(),
            cheat: false,
        }
    }

    fn step(&mut self) -> ProjectorTick {
        let mut ctx = TickContext {
            delta: 1.0,
            cheat: self.cheat,
            projectiles: &mut self.projectiles,
            consumers: &mut self.consumers,
            proxies: &mut self.proxies,
        };
        self.projector.update(&mut ctx)
    }
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn test_adequate_power_brings_field_up_on_crossing() {
    let projector = ForceProjector::new(1, default_config(), Vec2::ZERO, Team::SHARDED);
    let mut world = World::new(projector);

    let mut flipped_at = None;
    let mut last_warmup = 0.0;
    for tick in 1..=200 {
        world.projector.power.satisfaction = 1.0;
        let before = world.projector.state.warmup;
        let out = world.step();
        let after = world.projector.state.warmup;
        assert!(after >= last_warmup, "warmup must rise monotonically");
        last_warmup = after;

        let recovered = out
            .events
            .iter()
            .any(|e| matches!(e, ShieldEvent::Recovered { .. }));
        if recovered {
            assert!(before < 0.9 && after >= 0.9);
            assert!(flipped_at.is_none(), "recovers exactly once");
            flipped_at = Some(tick);
        } else if flipped_at.is_none() {
            assert!(world.projector.is_broken());
        }
    }

    assert_eq!(flipped_at, Some(22));
    assert!(!world.projector.is_broken());
    assert!(world.projector.state.warmup > 0.999);
    assert!(world.projector.state.radius_scale > 0.99);
}

#[test]
fn test_charging_from_the_graph_sustains_the_field() {
    let projector = ForceProjector::new(1, default_config(), Vec2::ZERO, Team::SHARDED);
    let mut world = World::new(projector);

    for _ in 0..300 {
        world.projector.power.charge(1.0, 1.0);
        world.step();
    }

    assert!(!world.projector.is_broken());
    // Net +0.8 units per tick saturates the buffer
    assert!(world.projector.power.satisfaction > 0.99);
}

#[test]
fn test_starved_field_collapses_quietly() {
    let mut world = World::new(healthy_projector(default_config()));
    world.projector.power.satisfaction = 0.0;

    let mut causes = Vec::new();
    for _ in 0..40 {
        for event in world.step().events {
            if let ShieldEvent::Broke { cause, .. } = event {
                causes.push(cause);
            }
        }
    }

    assert_eq!(causes, vec![BreakCause::PowerLoss]);
    assert!(world.projector.is_broken());
}

// =============================================================================
// Absorption
// =============================================================================

#[test]
fn test_thousand_damage_hit_from_full_buffer() {
    let mut world = World::new(healthy_projector(sturdy_config()));
    world.cheat = true;
    world.projectiles.push(hostile(0.0, 10.0, 1000.0));

    let out = world.step();

    assert_eq!(out.absorbed(), 1);
    // min(1000 * 0.1 / 60, 1.0) empties the buffer, so the penalty applies
    assert_eq!(world.projector.power.satisfaction, 0.0);
    assert_eq!(world.projector.state.buildup, 3000.0);
}

#[test]
fn test_small_hit_without_penalty() {
    let mut world = World::new(healthy_projector(sturdy_config()));
    world.cheat = true;
    world.projector.power.satisfaction = 0.5;
    world.projectiles.push(hostile(0.0, 10.0, 6.0));

    world.step();

    // 6 * 0.1 / 60 = 0.01
    assert!((world.projector.power.satisfaction - 0.49).abs() < 1e-6);
    assert_eq!(world.projector.state.buildup, 6.0);
}

#[test]
fn test_near_empty_buffer_applies_penalty() {
    let mut world = World::new(healthy_projector(sturdy_config()));
    world.cheat = true;
    world.projector.power.satisfaction = 0.000_05;
    world.projectiles.push(hostile(0.0, 10.0, 6.0));

    world.step();

    assert_eq!(world.projector.power.satisfaction, 0.0);
    assert_eq!(world.projector.state.buildup, 18.0);
}

#[test]
fn test_friendly_projectiles_never_absorbed() {
    let mut world = World::new(healthy_projector(default_config()));
    world
        .projectiles
        .extend(volley(Vec2::ZERO, 12, 30.0, 50.0, Team::SHARDED));

    for _ in 0..10 {
        assert_eq!(world.step().absorbed(), 0);
    }
    assert!(world.projectiles.iter().all(|p| !p.is_absorbed()));
    assert_eq!(world.projector.state.buildup, 0.0);
}

#[test]
fn test_heavy_volley_overloads_and_clamps() {
    let mut world = World::new(healthy_projector(default_config()));
    world
        .projectiles
        .extend(volley(Vec2::ZERO, 6, 20.0, 150.0, Team::CRUX));

    let out = world.step();

    assert_eq!(out.absorbed(), 6);
    assert!(world.projector.is_broken());
    assert_eq!(world.projector.state.buildup, 550.0);
    assert!(out.events.iter().any(ShieldEvent::plays_break_effect));
    assert!(world.projector.state.proxy.is_some());
}

#[test]
fn test_broken_field_lets_everything_through() {
    let projector = ForceProjector::new(1, default_config(), Vec2::ZERO, Team::SHARDED);
    let mut world = World::new(projector);
    world.projectiles.push(hostile(0.0, 0.0, 10.0));

    for _ in 0..5 {
        assert_eq!(world.step().absorbed(), 0);
    }
    assert_eq!(world.projector.hit_flash(), 0.0);
}

#[test]
fn test_order_decides_who_pays_the_penalty() {
    let run = |first: f32, second: f32| {
        let mut world = World::new(healthy_projector(sturdy_config()));
        world.cheat = true;
        world.projector.power.satisfaction = 0.6;
        world.projectiles.push(hostile(0.0, 5.0, first));
        world.projectiles.push(hostile(0.0, -5.0, second));
        world.step();
        world.projector.state.buildup
    };

    // The 300-damage hit drains 0.5; the one that lands on the empty
    // buffer is tripled.
    assert_eq!(run(300.0, 60.0), 300.0 + 180.0);
    assert_eq!(run(60.0, 300.0), 60.0 + 900.0);
}

// =============================================================================
// Hit flash, items, coolant
// =============================================================================

#[test]
fn test_hit_flash_fades_after_absorption() {
    let mut world = World::new(healthy_projector(sturdy_config()));
    world.cheat = true;
    world.projectiles.push(hostile(0.0, 0.0, 1.0));
    world.step();
    assert_eq!(world.projector.hit_flash(), 1.0);

    world.projectiles = ProjectileSet::new();
    for _ in 0..5 {
        world.step();
    }
    assert!(world.projector.hit_flash() < 1e-6);
}

#[test]
fn test_items_widen_the_field() {
    let mut world = World::new(healthy_projector(default_config()));
    world.cheat = true;
    world.consumers.items = 10;

    for _ in 0..100 {
        world.step();
    }

    // heat approaches 1 (10/10), radius approaches 100 + 80
    assert!(world.projector.effective_radius() > 179.0);
    assert!(world.projector.effective_radius() <= 180.0);
}

#[test]
fn test_items_consumed_while_up() {
    let mut world = World::new(healthy_projector(default_config()));
    world.cheat = true;
    world.consumers.items = 5;

    for _ in 0..1050 {
        world.projector.power.satisfaction = 1.0;
        world.step();
    }

    assert_eq!(world.consumers.items_removed, 3);
}

#[test]
fn test_invalid_consumers_block_item_use() {
    let mut world = World::new(healthy_projector(default_config()));
    world.cheat = true;
    world.consumers.items = 5;
    world.consumers.valid = false;

    for _ in 0..400 {
        world.projector.power.satisfaction = 1.0;
        world.step();
    }

    assert_eq!(world.consumers.items_removed, 0);
}

#[test]
fn test_coolant_speeds_recovery_from_overload() {
    let recovery_ticks = |coolant: Option<Coolant>| {
        let mut world = World::new(healthy_projector(default_config()));
        if let Some(coolant) = coolant {
            world.consumers.liquid = Some((coolant, 1000.0));
        }
        world.projector.state.buildup = 100.0;

        let mut ticks = 0;
        while world.projector.state.buildup > 0.0 {
            world.projector.power.satisfaction = 1.0;
            world.step();
            ticks += 1;
        }
        ticks
    };

    let dry = recovery_ticks(None);
    let water = recovery_ticks(Some(Coolant::WATER));
    let cryo = recovery_ticks(Some(Coolant::CRYOFLUID));
    let oil = recovery_ticks(Some(Coolant::OIL));

    assert!(water < dry);
    assert!(cryo < water);
    assert_eq!(oil, dry);
}

// =============================================================================
// Rendering and lifecycle
// =============================================================================

#[test]
fn test_draw_tracks_effective_radius() {
    let mut world = World::new(healthy_projector(default_config()));
    world.projector.position = Vec2::new(10.0, 20.0);
    let draw = world.projector.draw();

    assert_eq!(draw.center, Vec2::new(10.0, 20.0));
    assert_eq!(draw.radius, world.projector.effective_radius());
    assert_eq!(draw.draw_size, draw.radius * 2.0 + 2.0);
    assert!(draw.flash_alpha.is_none());
}

#[test]
fn test_stale_proxy_is_recreated() {
    let mut world = World::new(healthy_projector(default_config()));
    world.cheat = true;
    world.step();
    let first = world.projector.state.proxy.unwrap();

    world.proxies.remove(first);
    world.step();
    let second = world.projector.state.proxy.unwrap();

    assert_ne!(first, second);
    assert!(world.proxies.contains(second));
}

#[test]
fn test_host_sweeps_proxies_of_removed_projectors() {
    let mut sim = ShieldSimulation::new();
    let a = sim.spawn(default_config(), Vec2::ZERO, Team::SHARDED);
    let b = sim.spawn(default_config(), Vec2::new(300.0, 0.0), Team::SHARDED);
    let mut projectiles = ProjectileSet::new();
    sim.tick(&mut projectiles);
    assert_eq!(sim.proxies().len(), 2);

    sim.despawn(a).unwrap();
    sim.tick(&mut projectiles);

    let owners: Vec<_> = sim.proxies().sorted().into_iter().map(|(_, p)| p.owner).collect();
    assert_eq!(owners, vec![b]);
}

#[test]
fn test_save_load_mid_battle() {
    let mut world = World::new(healthy_projector(default_config()));
    world
        .projectiles
        .extend(volley(Vec2::ZERO, 3, 20.0, 40.0, Team::CRUX));
    world.step();

    let mut bytes = Vec::new();
    world.projector.write_state(&mut bytes).unwrap();
    assert_eq!(bytes.len(), 17);

    let mut restored = ForceProjector::new(1, default_config(), Vec2::ZERO, Team::SHARDED);
    restored.read_state(bytes.as_slice()).unwrap();
    assert!(restored.state.persisted_eq(&world.projector.state));
    assert_eq!(restored.hit_flash(), 0.0);
}
