//! CROUPIER — Monte Carlo simulator for roulette staking systems.
//!
//! Entry point. Parses flags, loads optional TOML configuration,
//! initialises structured logging, runs the simulation, prints the final
//! player report, and optionally exports the bankroll chart.

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

use croupier::chart;
use croupier::config::SimulationConfig;
use croupier::engine::Simulation;
use croupier::system::StakingSystem;
use croupier::types::{PlayerState, SpinReport};
use croupier::wheel::Wheel;

const BANNER: &str = r#"
  ____ ____   ___  _   _ ____ ___ _____ ____
 / ___|  _ \ / _ \| | | |  _ \_ _| ____|  _ \
| |   | |_) | | | | | | | |_) | ||  _| | |_) |
| |___|  _ <| |_| | |_| |  __/ | || |___|  _ <
 \____|_| \_\ \___/ \___/|_|  |___|_____|_| \_\

  Staking-System Monte Carlo Simulator
  v0.1.0
"#;

/// Roulette staking-system Monte Carlo simulator.
#[derive(Debug, Parser)]
#[command(name = "croupier", version, about)]
struct Cli {
    /// Staking system: martingale, fibonacci-progression, rotation-a,
    /// rotation-b, composite-two-slot.
    #[arg(long, short = 's')]
    system: Option<String>,

    /// Number of spins to simulate.
    #[arg(long, short = 'n')]
    spins: Option<u64>,

    /// Starting bankroll.
    #[arg(long)]
    bankroll: Option<f64>,

    /// Opening stake.
    #[arg(long)]
    stake: Option<f64>,

    /// Number of holes on the wheel.
    #[arg(long)]
    holes: Option<u32>,

    /// RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the bankroll trajectory as an SVG line chart to this path.
    #[arg(long)]
    chart: Option<PathBuf>,

    /// TOML configuration file (flags override file values).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of the human summary.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // -- Configuration: file, then flag overrides -------------------------

    let mut cfg = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(system) = &cli.system {
        cfg.system = system.clone();
    }
    if let Some(spins) = cli.spins {
        cfg.spins = spins;
    }
    if let Some(bankroll) = cli.bankroll {
        cfg.bankroll = bankroll;
    }
    if let Some(stake) = cli.stake {
        cfg.stake = stake;
    }
    if let Some(holes) = cli.holes {
        cfg.wheel.holes = holes;
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }

    init_logging();

    // Reject bad parameters (unknown system names included) before any spin.
    cfg.validate()?;
    let kind = cfg.kind()?;

    if !cli.json {
        println!("{BANNER}");
    }
    info!(
        system = %kind,
        spins = cfg.spins,
        bankroll = cfg.bankroll,
        stake = cfg.stake,
        holes = cfg.wheel.holes,
        seed = ?cfg.seed,
        "Simulation configured"
    );

    // -- Build components --------------------------------------------------

    let wheel = Wheel::new(cfg.wheel.holes)?;
    let system = match cfg.table_for(kind) {
        Some(table) => StakingSystem::with_table(kind, cfg.stake, table.to_vec())?,
        None => StakingSystem::new(kind, cfg.stake)?,
    };
    let mut rng: StdRng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // -- Run ---------------------------------------------------------------

    let mut player = PlayerState::new(cfg.bankroll);
    let mut simulation = Simulation::new(wheel, system);
    simulation.run(&mut rng, &mut player, cfg.spins);

    // -- Report ------------------------------------------------------------

    let report = SpinReport::new(kind.name(), cfg.spins, kind.payback_rate(), cfg.bankroll, &player);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Some(path) = &cli.chart {
        chart::save(&player.history, path)?;
        info!(path = %path.display(), "Bankroll chart written");
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("croupier=info"));

    let json_logging = std::env::var("CROUPIER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
