//! Bias Diffusion Simulator
//!
//! Builds a population on a rewired ring lattice, runs tension-driven bias
//! steps over it and writes snapshots plus a tension trace for renderers.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use bias_core::output::{
    generate_snapshot, write_current_state, write_snapshot_to_dir, RunStats, TraceLogger,
};
use bias_core::{SimConfig, SimError, Simulation};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "bias_sim")]
#[command(about = "Tension-driven bias diffusion on a rewired ring lattice")]
struct Args {
    /// Tuning file (defaults to tuning.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Population size; values below 2 are clamped
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,

    /// Number of forward edges to rewire randomly
    #[arg(long)]
    random_connections: Option<usize>,

    /// Number of bias iterations to run
    #[arg(long)]
    iterations: Option<u64>,

    /// Seed for tension noise
    #[arg(long)]
    seed: Option<u64>,

    /// Seed for initial opinions and rewiring
    #[arg(long)]
    network_seed: Option<u64>,

    /// Steps between snapshots (0 disables periodic snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots and the tension trace
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip writing any output files
    #[arg(long)]
    no_output: bool,
}

impl Args {
    fn into_config(self) -> Result<(SimConfig, bool), SimError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::load_or_default()?,
        };

        if let Some(size) = self.size {
            config.population.size = size;
        }
        if let Some(random_connections) = self.random_connections {
            config.population.random_connections = random_connections;
        }
        if let Some(seed) = self.network_seed {
            config.population.seed = seed;
        }
        if let Some(seed) = self.seed {
            config.tension.seed = seed;
        }
        if let Some(iterations) = self.iterations {
            config.run.iterations = iterations;
        }
        if let Some(interval) = self.snapshot_interval {
            config.run.snapshot_interval = interval;
        }
        if let Some(dir) = self.output_dir {
            config.run.output_dir = dir;
        }

        Ok((config, !self.no_output))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let (config, write_output) = args.into_config()?;
    let output_dir = write_output.then(|| config.run.output_dir.clone());
    let interval = config.run.snapshot_interval;

    tracing::info!(
        size = config.population.size,
        random_connections = config.population.random_connections,
        iterations = config.run.iterations,
        seed = config.tension.seed,
        "Starting bias simulation"
    );

    let mut sim = Simulation::new(&config)?;
    let initial = sim.population().opinions();

    let mut trace = match &output_dir {
        Some(dir) => {
            let start = generate_snapshot(sim.population(), 0, sim.tension(), "simulation_start");
            write_snapshot_to_dir(&start, dir)?;
            write_current_state(&start, dir)?;
            TraceLogger::new(dir.join("tension.jsonl"))?
        }
        None => TraceLogger::null(),
    };

    let mut failure: Option<SimError> = None;
    let summary = sim.run_with(config.run.iterations, |population, sample| {
        if failure.is_some() {
            return;
        }
        if let Err(e) = trace.log(sample) {
            failure = Some(e);
            return;
        }

        let completed = sample.step + 1;
        if let Some(dir) = &output_dir {
            if interval > 0 && completed % interval == 0 {
                let snapshot = generate_snapshot(population, completed, sample.tension, "periodic");
                if let Err(e) = write_snapshot_to_dir(&snapshot, dir) {
                    failure = Some(e);
                }
            }
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }
    trace.flush()?;

    if let Some(dir) = &output_dir {
        let end = generate_snapshot(
            sim.population(),
            summary.iterations,
            summary.final_tension,
            "simulation_end",
        );
        write_snapshot_to_dir(&end, dir)?;
        write_current_state(&end, dir)?;
        tracing::info!("Wrote output to {}", dir.display());
    }

    let stats = RunStats::collect(&initial, sim.population(), &summary.samples);
    println!("{}", stats);
    Ok(())
}
