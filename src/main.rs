//! route-optimizer command line.
//!
//! Reads a `name,address` CSV, computes an efficient visiting order and
//! writes the reordered rows to a new CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use route_optimizer::builder::{BuilderOptions, RouteBuilder};
use route_optimizer::config::Config;
use route_optimizer::geocode::{RetryPolicy, RetryingGeocoder};
use route_optimizer::haversine::HaversineMatrix;
use route_optimizer::model::{Endpoint, RouteRequest};
use route_optimizer::ors::OrsClient;
use route_optimizer::osrm::{OsrmClient, OsrmConfig};
use route_optimizer::solver::SolverKind;
use route_optimizer::table::{self, DEFAULT_EXPORT_NAME};
use route_optimizer::traits::DistanceMatrixProvider;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Provider {
    /// OpenRouteService driving distances
    Ors,
    /// Self-hosted OSRM table service
    Osrm,
    /// Straight-line distances, no network
    Haversine,
}

#[derive(Debug, Parser)]
#[command(name = "route-optimizer", version, about = "Reorder a list of addresses into an efficient route")]
struct Cli {
    /// CSV file with `name` and `address` columns
    input: PathBuf,

    /// Where to write the optimized route
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    output: PathBuf,

    /// Custom start address (not part of the output)
    #[arg(long, conflicts_with = "start_first")]
    start: Option<String>,

    /// Custom end address (not part of the output)
    #[arg(long, conflicts_with = "end_first")]
    end: Option<String>,

    /// Start from the first address in the file (listed first)
    #[arg(long)]
    start_first: bool,

    /// Close the loop back to the first address in the file
    #[arg(long)]
    end_first: bool,

    /// Tour heuristic: nearest-neighbor, local-search or annealing
    #[arg(long, default_value_t = SolverKind::LocalSearch)]
    solver: SolverKind,

    /// Distance source
    #[arg(long, value_enum, default_value_t = Provider::Ors)]
    provider: Provider,

    /// OSRM base URL when `--provider osrm`
    #[arg(long, default_value = "http://localhost:5000")]
    osrm_url: String,

    /// OSRM profile when `--provider osrm`
    #[arg(long, default_value = "car")]
    osrm_profile: String,
}

fn endpoint(custom: Option<String>, first: bool) -> Endpoint {
    match custom {
        Some(address) => Endpoint::CustomAddress(address),
        None if first => Endpoint::FirstInputPoint,
        None => Endpoint::None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    // Reject a malformed upload before any network call.
    let input = File::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let addresses = table::read_addresses(input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    info!(addresses = addresses.len(), input = %cli.input.display(), "loaded addresses");

    let ors = OrsClient::new(config.ors.clone()).context("failed to build HTTP client")?;
    let geocoder = RetryingGeocoder::new(&ors, RetryPolicy::with_max_retries(config.geocode_max_retries));

    let provider: Box<dyn DistanceMatrixProvider> = match cli.provider {
        Provider::Ors => Box::new(ors.clone()),
        Provider::Osrm => Box::new(
            OsrmClient::new(OsrmConfig {
                base_url: cli.osrm_url.clone(),
                profile: cli.osrm_profile.clone(),
                timeout_secs: config.ors.timeout_secs,
            })
            .context("failed to build OSRM client")?,
        ),
        Provider::Haversine => Box::new(HaversineMatrix::default()),
    };
    let solver = cli.solver.build();
    info!(solver = %cli.solver, provider = ?cli.provider, "optimizing");

    let request = RouteRequest::new(addresses)
        .start(endpoint(cli.start, cli.start_first))
        .end(endpoint(cli.end, cli.end_first));

    let report = RouteBuilder::new(&geocoder, provider.as_ref(), solver.as_ref())
        .with_options(BuilderOptions {
            geocode_concurrency: config.geocode_concurrency,
        })
        .build(&request)
        .context("route optimization failed")?;

    let output = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    table::write_route(BufWriter::new(output), &report.rows)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(
        rows = report.rows.len(),
        skipped = report.failed.len(),
        cost = report.cost,
        output = %cli.output.display(),
        "optimized route written"
    );
    Ok(())
}
