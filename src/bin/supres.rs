use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use supres::io::{read_prices, write_posterior};
use supres::misc::vec_to_string;
use supres::{fit, FitConfig};

#[derive(Parser)]
#[command(name = "supres")]
#[command(version)]
#[command(about = "Learn support and resistance price levels", long_about = None)]
struct Cli {
    /// Comma-separated price observations
    input: PathBuf,

    /// Where to write the levels, variances, and mixing weights
    output: PathBuf,

    /// Number of price levels
    components: usize,

    /// Maximum number of inference iterations
    #[arg(long, default_value_t = supres::fit::DEFAULT_MAX_ITERS)]
    max_iters: usize,

    /// Relative ELBO change at which inference stops
    #[arg(long, default_value_t = supres::fit::DEFAULT_TOL)]
    tol: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let file = File::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    let prices = read_prices(file)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    info!(n = prices.len(), k = cli.components, "loaded prices");

    let config = FitConfig::default()
        .with_max_iters(cli.max_iters)
        .with_tol(cli.tol);
    let result = fit(&prices, cli.components, &config)?;

    if !result.converged {
        warn!(
            iters = result.iterations,
            "reporting levels from an unconverged fit"
        );
    }

    let k = result.posterior.k();
    println!("{}", vec_to_string(result.means(), k));
    println!("Variance:");
    println!("{}", vec_to_string(result.variances(), k));

    let out = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    write_posterior(BufWriter::new(out), &result.posterior)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    Ok(())
}
