//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the shield simulation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Saved games and replays must reproduce the same shield states bit for
//! bit. Sources of non-determinism include:
//!
//! - **Evaluation order**: Absorption drains power cumulatively, so the
//!   order projectiles are visited changes the outcome. The host visits
//!   projectors in id order and projectiles in insertion order.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Anything that affects state is iterated in sorted order.
//!
//! - **System randomness**: Smoke chances are reported, never rolled,
//!   inside the core.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use shield_core::prelude::*;

use crate::fixtures::{Barrage, BarrageSpec};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run the same barrage twice and compare final hashes.
pub fn verify_barrage_determinism(spec: &BarrageSpec, config: &ShieldConfig, ticks: u64) -> bool {
    verify_determinism(
        2,
        ticks,
        || Barrage::new(spec.clone(), config),
        |barrage| {
            barrage.step();
        },
        Barrage::state_hash,
    )
    .is_deterministic
}

/// Run `runs` barrages on scoped threads and collect final hashes.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_barrages(
    spec: &BarrageSpec,
    config: &ShieldConfig,
    runs: usize,
    ticks: u64,
) -> DeterminismResult {
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..runs)
            .map(|_| {
                s.spawn(|| {
                    let mut barrage = Barrage::new(spec.clone(), config);
                    for _ in 0..ticks {
                        barrage.step();
                    }
                    barrage.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("barrage thread panicked"))
            .collect()
    });

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Compare two barrage runs tick-by-tick, finding first divergence.
///
/// # Returns
///
/// `None` if the runs are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence(spec: &BarrageSpec, config: &ShieldConfig, ticks: u64) -> Option<u64> {
    let mut a = Barrage::new(spec.clone(), config);
    let mut b = Barrage::new(spec.clone(), config);

    if a.state_hash() != b.state_hash() {
        return Some(0);
    }

    for tick in 1..=ticks {
        a.step();
        b.step();

        if a.state_hash() != b.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Save every projector's state after `ticks`, load into a fresh host
/// and check the persisted fields came back bit-identical.
pub fn verify_persistence_roundtrip(spec: &BarrageSpec, config: &ShieldConfig, ticks: u64) -> bool {
    let mut barrage = Barrage::new(spec.clone(), config);
    for _ in 0..ticks {
        barrage.step();
    }

    let mut fresh = Barrage::new(spec.clone(), config);
    let ids: Vec<ProjectorId> = (1..=spec.projectors.len() as ProjectorId).collect();

    ids.iter().all(|&id| {
        let Ok(bytes) = barrage.sim.save_state(id) else {
            return false;
        };
        if fresh.sim.load_state(id, &bytes).is_err() {
            return false;
        }
        match (barrage.sim.get(id), fresh.sim.get(id)) {
            (Some(saved), Some(loaded)) => saved
                .projector
                .state
                .persisted_eq(&loaded.projector.state),
            _ => false,
        }
    })
}

/// Compute a simple hash for any hashable value, such as a saved state blob.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{default_config, sturdy_config};
    use proptest::prelude::*;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, compute_hash);

        let expected = compute_hash(&100u64);
        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![expected; 3]);
        assert_eq!(result.unique_hashes(), vec![expected]);
    }

    #[test]
    fn test_saved_bytes_are_deterministic() {
        let spec = BarrageSpec {
            damage: 90.0,
            ..BarrageSpec::default()
        };
        let result = verify_determinism(
            3,
            200,
            || Barrage::new(spec.clone(), &default_config()),
            |barrage| {
                barrage.step();
            },
            |barrage| compute_hash(&barrage.sim.save_state(1).unwrap()),
        );
        result.assert_deterministic();
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_panics_on_mismatch() {
        DeterminismResult {
            is_deterministic: false,
            hashes: vec![1, 2],
            ticks: 1,
        }
        .assert_deterministic();
    }

    #[test]
    fn test_empty_host_determinism() {
        let result = verify_determinism(
            2,
            100,
            ShieldSimulation::new,
            |sim| {
                sim.tick(&mut ProjectileSet::new());
            },
            ShieldSimulation::state_hash,
        );
        result.assert_deterministic();
    }

    #[test]
    fn test_default_barrage_determinism() {
        assert!(verify_barrage_determinism(
            &BarrageSpec::default(),
            &default_config(),
            300
        ));
    }

    #[test]
    fn test_overloading_barrage_determinism() {
        let spec = BarrageSpec {
            damage: 200.0,
            volley_every: 3,
            volley_size: 8,
            ..BarrageSpec::default()
        };
        assert!(verify_barrage_determinism(&spec, &default_config(), 500));
        assert!(find_first_divergence(&spec, &default_config(), 200).is_none());
    }

    #[test]
    fn test_parallel_barrages() {
        let spec = BarrageSpec {
            projectors: vec![(0.0, 0.0), (120.0, 0.0), (0.0, 120.0)],
            ..BarrageSpec::default()
        };
        run_parallel_barrages(&spec, &sturdy_config(), 4, 200).assert_deterministic();
    }

    #[test]
    fn test_persistence_roundtrip_after_barrage() {
        let spec = BarrageSpec {
            damage: 120.0,
            ..BarrageSpec::default()
        };
        assert!(verify_persistence_roundtrip(&spec, &default_config(), 150));
    }

    proptest! {
        #[test]
        fn prop_random_barrages_are_deterministic(
            supply in 0.0f32..2.0,
            damage in 1.0f32..400.0,
            volley_every in 1u64..20,
            volley_size in 0usize..12,
            spread in 0.0f32..150.0,
        ) {
            let spec = BarrageSpec {
                projectors: vec![(0.0, 0.0)],
                supply,
                damage,
                volley_every,
                volley_size,
                spread,
            };
            prop_assert!(verify_barrage_determinism(&spec, &default_config(), 120));
        }
    }
}
