//! Command line batch runner: simulate a set of double pendulums and write
//! one trajectory CSV per job.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use pendulum_core::energy::total_energy;
use pendulum_core::output::{write_batch, DEFAULT_PREFIX};
use pendulum_core::{Scheme, SimulationConfig};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "pendulum")]
#[command(about = "Parallel double pendulum simulator")]
#[command(version)]
pub struct Args {
    /// JSON batch configuration; the built-in five-job batch is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the trajectory files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// File name prefix, files are named <prefix>_<sim_id>.csv
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Integration scheme
    #[arg(long, value_enum)]
    scheme: Option<SchemeArg>,

    /// Worker threads (0 = available hardware concurrency)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    // ── Parameter overrides ───────────────────────────────────
    #[arg(long)]
    steps: Option<usize>,

    #[arg(long)]
    dt: Option<f64>,

    #[arg(long = "g")]
    g: Option<f64>,

    #[arg(long)]
    l1: Option<f64>,

    #[arg(long)]
    l2: Option<f64>,

    #[arg(long)]
    m1: Option<f64>,

    #[arg(long)]
    m2: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemeArg {
    Rk4,
    Euler,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Rk4 => Scheme::Rk4,
            SchemeArg::Euler => Scheme::Euler,
        }
    }
}

/// Loads the configuration file (if any) and applies command line overrides.
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(scheme) = args.scheme {
        config.scheme = scheme.into();
    }
    if let Some(threads) = args.threads {
        config.threads = Some(threads);
    }

    let p = &mut config.parameters;
    if let Some(steps) = args.steps {
        p.steps = steps;
    }
    if let Some(dt) = args.dt {
        p.dt = dt;
    }
    if let Some(g) = args.g {
        p.g = g;
    }
    if let Some(l1) = args.l1 {
        p.l1 = l1;
    }
    if let Some(l2) = args.l2 {
        p.l2 = l2;
    }
    if let Some(m1) = args.m1 {
        p.m1 = m1;
    }
    if let Some(m2) = args.m2 {
        p.m2 = m2;
    }

    Ok(config)
}

pub fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let jobs = config.build_jobs().context("invalid simulation configuration")?;
    let orchestrator = config.orchestrator();

    info!(
        jobs = jobs.len(),
        threads = orchestrator.threads(),
        scheme = %config.scheme,
        steps = config.parameters.steps,
        dt = config.parameters.dt,
        "starting simulations"
    );

    let batch = orchestrator.run(&jobs).context("simulation batch failed")?;

    for job in &jobs {
        let id = job.sim_id();
        match batch.get(id) {
            Some(Ok(trajectory)) => {
                let e0 = total_energy(job.params(), &job.initial());
                let drift = trajectory
                    .final_state()
                    .map(|s| total_energy(job.params(), &s) - e0)
                    .unwrap_or(0.0);
                info!(sim_id = id, samples = trajectory.len(), energy_drift = drift, "simulation complete");
            }
            Some(Err(err)) => error!(sim_id = id, error = %err, "simulation failed"),
            None => error!(sim_id = id, "simulation produced no outcome"),
        }
    }

    let written = write_batch(&args.output_dir, &args.prefix, &batch)
        .with_context(|| format!("cannot prepare output directory {}", args.output_dir.display()))?;
    let mut write_failures = 0;
    for (sim_id, outcome) in &written {
        match outcome {
            Ok(path) => info!(sim_id, path = %path.display(), "wrote trajectory"),
            Err(err) => {
                write_failures += 1;
                error!(sim_id, error = %err, "failed to write trajectory");
            }
        }
    }

    let faults = batch.fault_count();
    if faults > 0 || write_failures > 0 {
        bail!(
            "{faults} of {} simulations failed, {write_failures} trajectory files could not be written",
            batch.len()
        );
    }

    info!(files = written.len(), dir = %args.output_dir.display(), "all simulations complete");
    Ok(())
}
