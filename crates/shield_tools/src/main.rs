//! Force Projector - Development Tools

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shield_core::config::ShieldConfig;
use shield_tools::scenario::BarrageScenario;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shield-tools")]
#[command(about = "Development tools for the force projector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate block definitions
    Validate {
        /// RON file or directory of RON files
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
    /// Run one projector under a periodic hostile volley
    Simulate {
        /// Block definition (defaults to the stock projector)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Scenario file; flags below override its values
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Ticks to simulate
        #[arg(long)]
        ticks: Option<u64>,
        /// Power offered per tick
        #[arg(long)]
        supply: Option<f32>,
        /// Shield damage per projectile
        #[arg(long)]
        damage: Option<f32>,
        /// Ticks between volleys
        #[arg(long)]
        volley_every: Option<u64>,
        /// Projectiles per volley
        #[arg(long)]
        volley_size: Option<usize>,
        /// Run without upkeep
        #[arg(long)]
        cheat: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a persisted 17-byte shield state
    Inspect {
        /// State file
        path: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating block definitions in: {}", path.display());
            match shield_tools::validate::validate_path(&path) {
                Ok(configs) => {
                    for (file, config) in &configs {
                        let stats = config.stats();
                        println!(
                            "{}: ok (radius {}, breakage {}, {:.1} power/s)",
                            file.display(),
                            config.radius,
                            config.breakage,
                            stats.power_use_per_second
                        );
                    }
                    tracing::info!("Validation passed");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Simulate {
            config,
            scenario,
            ticks,
            supply,
            damage,
            volley_every,
            volley_size,
            cheat,
            json,
        } => {
            let config = match config.map_or_else(|| Ok(ShieldConfig::default()), ShieldConfig::load) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("Failed to load config: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let mut barrage = match scenario.map_or_else(|| Ok(BarrageScenario::default()), BarrageScenario::load) {
                Ok(barrage) => barrage,
                Err(e) => {
                    tracing::error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            if let Some(ticks) = ticks {
                barrage.ticks = ticks;
            }
            if let Some(supply) = supply {
                barrage.supply = supply;
            }
            if let Some(damage) = damage {
                barrage.damage = damage;
            }
            if let Some(volley_every) = volley_every {
                barrage.volley_every = volley_every;
            }
            if let Some(volley_size) = volley_size {
                barrage.volley_size = volley_size;
            }
            barrage.cheat |= cheat;

            let report = match barrage.run(&config) {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!("Scenario failed: {e}");
                    return ExitCode::FAILURE;
                }
            };
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        tracing::error!("Failed to encode report: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{report}");
            }
            ExitCode::SUCCESS
        }
        Commands::Inspect { path, json } => match shield_tools::inspect::inspect_file(&path) {
            Ok(summary) => {
                if json {
                    match serde_json::to_string_pretty(&summary) {
                        Ok(text) => println!("{text}"),
                        Err(e) => {
                            tracing::error!("Failed to encode state: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{summary}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Failed to inspect {}: {e}", path.display());
                ExitCode::FAILURE
            }
        },
    }
}
