//! Ecosys CLI - headless runner for the agent ecosystem simulation.
//!
//! - `ecosys run` - run the simulation against an oracle and print the leaderboard
//! - `ecosys init` - write a default configuration file
//! - `ecosys show-config` - print the effective configuration

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use ecosys_core::rng::derive_seed;
use ecosys_core::{
    leaderboard, DeterministicRng, EventLog, HeuristicOracle, Oracle, ProcessOracle, SimConfig,
    Simulation, SplitMix64,
};

/// Ticks between autosaves of the in-process oracle.
const AUTOSAVE_EVERY: u64 = 180;
/// Ticks between progress lines.
const PROGRESS_EVERY: u64 = 600;

#[derive(Parser)]
#[command(name = "ecosys")]
#[command(about = "Agent ecosystem simulation", version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "ecosys.yaml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run {
        /// Simulated seconds to run
        #[arg(long, conflicts_with = "ticks")]
        seconds: Option<f64>,

        /// Fixed steps to run
        #[arg(long)]
        ticks: Option<u64>,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,

        /// Decision maker
        #[arg(long, value_enum, default_value_t = OracleKind::Heuristic)]
        oracle: OracleKind,

        /// Save file for the heuristic oracle
        #[arg(long)]
        save: Option<PathBuf>,

        /// Append simulation events to this JSONL file
        #[arg(long)]
        events: Option<PathBuf>,

        /// Pace steps by wall-clock time
        #[arg(long)]
        realtime: bool,

        /// Coins scattered at startup
        #[arg(long, default_value_t = 40)]
        coins: usize,

        /// Command for `--oracle process`, with its arguments
        #[arg(long = "oracle-cmd", num_args = 1.., allow_hyphen_values = true)]
        oracle_cmd: Vec<String>,
    },

    /// Write the default configuration
    Init {
        /// Destination (defaults to --config)
        path: Option<PathBuf>,
    },

    /// Print the effective configuration as YAML
    ShowConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OracleKind {
    /// Built-in rule-based policy
    Heuristic,
    /// External process speaking line-delimited JSON
    Process,
}

struct RunOptions {
    seconds: Option<f64>,
    ticks: Option<u64>,
    seed: Option<u64>,
    oracle: OracleKind,
    oracle_cmd: Vec<String>,
    save: Option<PathBuf>,
    events: Option<PathBuf>,
    realtime: bool,
    coins: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Some(Commands::Run {
            seconds,
            ticks,
            seed,
            oracle,
            save,
            events,
            realtime,
            coins,
            oracle_cmd,
        }) => run_simulation(
            &cli.config,
            RunOptions {
                seconds,
                ticks,
                seed,
                oracle,
                oracle_cmd,
                save,
                events,
                realtime,
                coins,
            },
        ),
        Some(Commands::Init { path }) => init_config(path.as_deref().unwrap_or(&cli.config)),
        Some(Commands::ShowConfig) => show_config(&cli.config),
        None => {
            println!("Ecosys - Agent Ecosystem Simulation");
            println!();
            println!("Usage: ecosys <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run          Run the simulation");
            println!("  init         Write the default configuration");
            println!("  show-config  Print the effective configuration");
            println!();
            println!("Run 'ecosys --help' for more information.");
            Ok(())
        }
    }
}

fn build_oracle(config: &SimConfig, opts: &RunOptions) -> Result<Box<dyn Oracle>> {
    match opts.oracle {
        OracleKind::Heuristic => {
            let mut oracle = HeuristicOracle::new(config.seed, config.economy.food_price);
            if let Some(path) = &opts.save {
                oracle = oracle.with_save_path(path, Some(AUTOSAVE_EVERY));
            }
            Ok(Box::new(oracle))
        }
        OracleKind::Process => {
            let Some((program, args)) = opts.oracle_cmd.split_first() else {
                bail!("--oracle process needs --oracle-cmd <COMMAND> [ARGS...]");
            };
            if opts.save.is_some() {
                tracing::warn!("--save is ignored for process oracles");
            }
            let oracle = ProcessOracle::spawn(program, args)
                .with_context(|| format!("Failed to start oracle `{}`", program))?;
            Ok(Box::new(oracle))
        }
    }
}

fn run_simulation(config_path: &Path, opts: RunOptions) -> Result<()> {
    let mut config = SimConfig::load_or_default(config_path)?;
    if let Some(seed) = opts.seed {
        config.seed = seed;
    }

    let target = match (opts.ticks, opts.seconds) {
        (Some(ticks), _) => ticks,
        (None, seconds) => (seconds.unwrap_or(60.0).max(0.0) / config.clock.dt).round() as u64,
    };
    let dt = config.clock.dt;
    let seed = config.seed;

    tracing::info!(
        config = %config_path.display(),
        seed,
        ticks = target,
        oracle = ?opts.oracle,
        "Starting simulation"
    );

    let oracle = build_oracle(&config, &opts)?;
    let mut sim = Simulation::new(config, oracle).context("Failed to start simulation")?;

    if let Some(path) = &opts.events {
        sim.set_event_log(EventLog::new(path));
    }

    let mut rng = SplitMix64::new(derive_seed(seed, 0, 1));
    let (width, height) = (sim.state().world.width(), sim.state().world.height());
    for _ in 0..opts.coins {
        let x = rng.range_f32(0.0, width);
        let y = rng.range_f32(0.0, height);
        sim.place_coin(x, y);
    }

    let mut degraded = 0u64;
    let mut last = Instant::now();
    while sim.tick() < target {
        let elapsed = if opts.realtime {
            let now = Instant::now();
            let elapsed = now.duration_since(last).as_secs_f64();
            last = now;
            elapsed
        } else {
            dt
        };

        for report in sim.frame_limited(elapsed, target - sim.tick()) {
            if report.degraded {
                degraded += 1;
            }
            if report.tick % PROGRESS_EVERY == 0 {
                let state = sim.state();
                let deaths: u32 = state.agents.iter().map(|a| a.deaths).sum();
                tracing::info!(
                    tick = report.tick,
                    coins = state.coins.len(),
                    crates = state.crates.len(),
                    deaths,
                    degraded,
                    "Progress"
                );
            }
        }

        if opts.realtime {
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    let (state, _oracle) = sim.shutdown();
    tracing::info!(tick = state.tick, degraded, "Simulation finished");

    println!("Leaderboard after {} ticks", state.tick);
    println!("=========================");
    for row in leaderboard(&state.agents) {
        println!("{}", row);
    }

    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let body = SimConfig::default().to_yaml()?;
    let contents = format!(
        "# Ecosys simulation configuration\n\
         #\n\
         # Every field is optional; missing fields take the values below.\n\
         # Reward magnitudes under `rewards` are sent to the oracle as shaping signals.\n\n{}",
        body
    );
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default configuration to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Adjust world, agents and rewards as needed");
    println!("  2. Run: ecosys run --config {}", path.display());

    Ok(())
}

fn show_config(path: &Path) -> Result<()> {
    let config = SimConfig::load_or_default(path)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
