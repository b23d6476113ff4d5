use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use qnetsim_config::QnetsimConfig;
use qnetsim_telemetry::{SimLogger, SimulationMetrics};
use tracing::info;

use crate::scenario::{self, ScenarioReport};

#[derive(Parser, Debug)]
#[command(
    name = "qnetsim",
    version,
    about = "Deterministic discrete-event simulation of quantum networks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the configured star network, run its workload and report the outcome
    Simulate(SimulateArgs),
    /// Print the resolved configuration as YAML
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Configuration file; defaults and `config/qnetsim.yaml` are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Master seed, overriding `simulation.seed`
    #[arg(long)]
    pub seed: Option<u64>,
    /// Stop time in picoseconds, overriding `simulation.stop_time`
    #[arg(long)]
    pub stop_time: Option<u64>,
    /// Print Prometheus metrics after the run
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Simulate(args) => simulate(args),
        Commands::Config(args) => {
            let config = load_config(args.config.as_deref())?;
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<QnetsimConfig> {
    match path {
        Some(path) => QnetsimConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display())),
        None => QnetsimConfig::load().context("loading configuration"),
    }
}

impl SimulateArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut QnetsimConfig) {
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(stop_time) = self.stop_time {
            config.simulation.stop_time = Some(stop_time);
        }
        if self.metrics {
            config.telemetry.metrics = true;
        }
    }
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);
    SimLogger::init(&config.telemetry.log_level);
    info!(
        seed = config.simulation.seed,
        spokes = config.topology.spokes,
        "starting simulation"
    );

    let report = scenario::run(&config).context("simulation failed")?;
    print_report(&report)?;

    if config.telemetry.metrics {
        let mut metrics = SimulationMetrics::new().context("creating metrics registry")?;
        metrics.record(&report.stats);
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

fn print_report(report: &ScenarioReport) -> anyhow::Result<()> {
    println!("relay map of {}:", report.hub);
    for (peer, relay) in &report.relay_map {
        println!("  {peer} -> {relay}");
    }
    print!("{}", serde_yaml::to_string(&report.stats)?);
    println!("trace_digest: {}", report.digest);
    Ok(())
}
