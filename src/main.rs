//! Compare closed-form and Monte Carlo estimates of the neutron lifetime.
//!
//! Running `betadecay` without arguments sweeps the default sample counts with an
//! entropy-seeded generator and prints a lifetime table.

use anyhow::{Context, Result};
use betadecay::{
    DEFAULT_LOWER, DEFAULT_PARTITIONS, DEFAULT_SAMPLE_COUNTS, DEFAULT_UPPER, MonteCarloIntegrator,
    NeutronBetaDecay, SweepConfig, report, run_sweep,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Neutron beta decay lifetime via Monte Carlo integration
#[derive(Parser, Debug)]
#[command(name = "betadecay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for reproducible sampling (OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated total sample counts to sweep
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SAMPLE_COUNTS.to_vec())]
    samples: Vec<usize>,

    /// Equal sub-intervals for the stratified estimates
    #[arg(short = 'k', long, default_value_t = DEFAULT_PARTITIONS)]
    partitions: usize,

    /// Integration interval start in MeV
    #[arg(long, default_value_t = DEFAULT_LOWER)]
    lower: f64,

    /// Integration interval end in MeV
    #[arg(long, default_value_t = DEFAULT_UPPER)]
    upper: f64,

    /// Override the rejection sampling bound
    #[arg(long)]
    upper_bound: Option<f64>,

    /// Write the sweep to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the density curve to this CSV file
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Energy step of the density curve in MeV
    #[arg(long, default_value_t = 1e-4)]
    curve_step: f64,
}

const DEFAULT_LOG_DIRECTIVE: &str = "betadecay=info";

/// Filter from `RUST_LOG` when it is set and parses, `betadecay=info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let cli = Cli::parse();
    let decay = NeutronBetaDecay::default();

    let griffiths = decay.griffiths_reference_integral();
    let reference = decay.reference_integral();
    println!("Griffiths constants: rate = {griffiths:e} 1/s, tau = {:.4} s", 1.0 / griffiths);
    println!("Current constants:   rate = {reference:e} 1/s, tau = {:.4} s", 1.0 / reference);

    if let Some(path) = &cli.curve {
        let curve = decay
            .density_curve(cli.lower, cli.upper, cli.curve_step)
            .context("failed to sample the density curve")?;
        report::save_curve(&curve, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), points = curve.energies.len(), "density curve written");
    }

    let config = SweepConfig {
        sample_counts: cli.samples,
        partitions: cli.partitions,
        lower: cli.lower,
        upper: cli.upper,
        upper_bound: cli.upper_bound,
    };
    let mut integrator = match cli.seed {
        Some(seed) => {
            info!(seed, "seeded generator");
            MonteCarloIntegrator::seeded(seed)
        }
        None => MonteCarloIntegrator::from_os_rng(),
    };

    let sweep = run_sweep(&decay, &mut integrator, &config).context("lifetime sweep failed")?;
    println!();
    println!("Lifetime estimates (s), {} sub-intervals for /k:", config.partitions);
    print!("{}", report::format_table(&sweep));

    if let Some(path) = &cli.output {
        report::save_sweep(&sweep, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = sweep.len(), "sweep written");
    }
    Ok(())
}
