//! Headless barrage scenarios.
//!
//! One projector at the origin under a periodic ring of hostile
//! projectiles. Used to tune block definitions without a game client.

use std::f32::consts::TAU;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shield_core::prelude::{
    BreakCause, Projectile, ProjectileSet, ShieldConfig, ShieldError, ShieldEvent,
    ShieldSimulation, Team, Vec2,
};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The shield core rejected something.
    #[error(transparent)]
    Shield(#[from] ShieldError),
}

/// Parameters of a barrage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrageScenario {
    /// Ticks to simulate.
    pub ticks: u64,
    /// Power offered per tick.
    pub supply: f32,
    /// Shield damage per projectile.
    pub damage: f32,
    /// Ticks between volleys; 0 disables firing.
    pub volley_every: u64,
    /// Projectiles per volley.
    pub volley_size: usize,
    /// Distance from the projector at which a volley arrives.
    pub spread: f32,
    /// Run the projector without upkeep.
    pub cheat: bool,
}

impl Default for BarrageScenario {
    fn default() -> Self {
        Self {
            ticks: 600,
            supply: 1.0,
            damage: 30.0,
            volley_every: 20,
            volley_size: 6,
            spread: 40.0,
            cheat: false,
        }
    }
}

/// Final persisted state of the projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalState {
    /// Field is down.
    pub broken: bool,
    /// Accumulated stress.
    pub buildup: f32,
    /// Radius multiplier.
    pub radius_scale: f32,
    /// Power adequacy indicator.
    pub warmup: f32,
    /// Charge buffer fill indicator.
    pub heat_level: f32,
    /// Buffer fill level.
    pub satisfaction: f32,
    /// Field radius.
    pub effective_radius: f32,
}

/// Summary of a barrage run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Ticks simulated.
    pub ticks: u64,
    /// Ticks that ended with the field down.
    pub ticks_broken: u64,
    /// Projectiles fired at the projector.
    pub fired: usize,
    /// Projectiles absorbed.
    pub absorbed: usize,
    /// Breaks caused by overload.
    pub overloads: u32,
    /// Breaks caused by power loss.
    pub power_losses: u32,
    /// Recoveries.
    pub recoveries: u32,
    /// Tick of the first recovery, if any.
    pub first_up: Option<u64>,
    /// Power units accepted from the graph.
    pub power_accepted: f32,
    /// State after the last tick.
    pub final_state: FinalState,
}

impl BarrageScenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        Ok(ron::from_str(ron)?)
    }

    fn volley(&self) -> impl Iterator<Item = Projectile> + '_ {
        (0..self.volley_size).map(move |i| {
            let angle = TAU * i as f32 / self.volley_size as f32;
            Projectile::new(
                Vec2::ZERO.offset_polar(angle, self.spread),
                Team::CRUX,
                self.damage,
            )
        })
    }

    /// Run the scenario against `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Shield`] if the projector cannot be set up.
    pub fn run(&self, config: &ShieldConfig) -> Result<ScenarioReport, ScenarioError> {
        let mut sim = ShieldSimulation::new();
        let id = sim.spawn(config.clone(), Vec2::ZERO, Team::SHARDED);
        sim.set_supply(id, self.supply)?;
        sim.set_cheat(id, self.cheat)?;

        let mut report = ScenarioReport {
            ticks: self.ticks,
            ticks_broken: 0,
            fired: 0,
            absorbed: 0,
            overloads: 0,
            power_losses: 0,
            recoveries: 0,
            first_up: None,
            power_accepted: 0.0,
            final_state: FinalState {
                broken: true,
                buildup: 0.0,
                radius_scale: 0.0,
                warmup: 0.0,
                heat_level: 0.0,
                satisfaction: 0.0,
                effective_radius: 0.0,
            },
        };

        for tick in 0..self.ticks {
            let mut projectiles = ProjectileSet::new();
            if self.volley_every > 0 && tick % self.volley_every == 0 {
                projectiles.extend(self.volley());
                report.fired += projectiles.len();
            }

            let events = sim.tick(&mut projectiles);
            report.absorbed += events.absorbed;
            report.power_accepted += events.power_accepted;
            for (_, event) in &events.events {
                match event {
                    ShieldEvent::Broke {
                        cause: BreakCause::Overload,
                        ..
                    } => report.overloads += 1,
                    ShieldEvent::Broke {
                        cause: BreakCause::PowerLoss,
                        ..
                    } => report.power_losses += 1,
                    ShieldEvent::Recovered { .. } => {
                        report.recoveries += 1;
                        report.first_up.get_or_insert(tick + 1);
                    }
                    ShieldEvent::Absorbed { .. } | ShieldEvent::ItemConsumed => {}
                }
            }

            let installation = sim.get(id).ok_or(ShieldError::UnknownProjector(id))?;
            if installation.projector.is_broken() {
                report.ticks_broken += 1;
            }
        }

        let installation = sim.get(id).ok_or(ShieldError::UnknownProjector(id))?;
        let projector = &installation.projector;
        report.final_state = FinalState {
            broken: projector.state.broken,
            buildup: projector.state.buildup,
            radius_scale: projector.state.radius_scale,
            warmup: projector.state.warmup,
            heat_level: projector.state.heat_level,
            satisfaction: projector.power.satisfaction,
            effective_radius: projector.effective_radius(),
        };

        tracing::info!(
            ticks = report.ticks,
            absorbed = report.absorbed,
            overloads = report.overloads,
            "Scenario complete"
        );
        Ok(report)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticks:          {}", self.ticks)?;
        writeln!(f, "Ticks broken:   {}", self.ticks_broken)?;
        match self.first_up {
            Some(tick) => writeln!(f, "First up:       tick {tick}")?,
            None => writeln!(f, "First up:       never")?,
        }
        writeln!(f, "Fired:          {}", self.fired)?;
        writeln!(f, "Absorbed:       {}", self.absorbed)?;
        writeln!(f, "Overloads:      {}", self.overloads)?;
        writeln!(f, "Power losses:   {}", self.power_losses)?;
        writeln!(f, "Recoveries:     {}", self.recoveries)?;
        writeln!(f, "Power accepted: {:.2}", self.power_accepted)?;
        let s = &self.final_state;
        writeln!(
            f,
            "Final:          {} buildup={:.2} warmup={:.3} radius={:.1} satisfaction={:.3}",
            if s.broken { "BROKEN" } else { "up" },
            s.buildup,
            s.warmup,
            s.effective_radius,
            s.satisfaction
        )
    }
}
