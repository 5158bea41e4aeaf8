use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rp_core::GeoPoint;
use rp_search::SearchConfig;

mod commands;
mod output;

#[derive(Parser, Debug)]
#[command(author, version, about = "Traffic-aware route search over directions steps")]
struct Cli {
    /// JSON search configuration; command-line flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Raise log verbosity (`-v` debug, `-vv` trace).  Ignored when
    /// `RUST_LOG` is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Traffic-guided best-first search.
    Astar,
    /// Zero-heuristic reference search.
    Dijkstra,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Great-circle distance in kilometres between two "lat,lng" points.
    Haversine {
        #[arg(allow_hyphen_values = true)]
        from: GeoPoint,
        #[arg(allow_hyphen_values = true)]
        to:   GeoPoint,
    },
    /// Search one candidate route from a directions file.
    Search {
        /// Directions response (`.json`) or step table (`.csv`).
        #[arg(long)]
        input:     PathBuf,
        /// Route id to search; defaults to the first route in the file.
        #[arg(long)]
        route:     Option<u32>,
        /// Snap the search start to the node nearest this "lat,lng".
        #[arg(long, allow_hyphen_values = true)]
        from:      Option<GeoPoint>,
        /// Snap the search goal to the node nearest this "lat,lng".
        #[arg(long, allow_hyphen_values = true)]
        to:        Option<GeoPoint>,
        /// Score as the best-route hypothesis.  The first route in the file
        /// always is; every other route is an alternative unless this is set.
        #[arg(long)]
        best:      bool,
        /// Override the assumed average speed.
        #[arg(long)]
        speed:     Option<f64>,
        #[arg(long, value_enum, default_value_t = Algorithm::Astar)]
        algorithm: Algorithm,
    },
    /// Search every candidate route and rank them by travel time.
    Compare {
        /// Directions response (`.json`) or step table (`.csv`).
        #[arg(long)]
        input:      PathBuf,
        /// Route id of the best-route hypothesis; defaults to the first route.
        #[arg(long)]
        best_route: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SearchConfig::from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => SearchConfig::default(),
    };

    match cli.command {
        Command::Haversine { from, to } => commands::handle_haversine(from, to, cli.format),
        Command::Search { input, route, from, to, best, speed, algorithm } => {
            let args = commands::SearchArgs { input, route, from, to, best, speed, algorithm };
            commands::handle_search(&args, config, cli.format)
        }
        Command::Compare { input, best_route } => {
            commands::handle_compare(&input, best_route, &config, cli.format)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
