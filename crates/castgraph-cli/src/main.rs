//! # castgraph CLI entry point
//!
//! Parses command-line arguments, loads the domain system, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use castgraph_cli::cast::{run_cast, CastArgs};
use castgraph_cli::describe::{run_describe, DescribeArgs};
use castgraph_cli::profile::load_system;
use castgraph_cli::resolve::{run_resolve, ResolveArgs};

/// castgraph: conversions between value representations.
///
/// Casts values between bytes, text, integers, floats, big integers,
/// decimals, digests, and time, failing loudly on any loss of precision.
#[derive(Parser, Debug)]
#[command(name = "castgraph", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML profile selecting domains and extra blocks.
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a value from one representation to another.
    Cast(CastArgs),

    /// Show how a pair of representations resolves.
    Resolve(ResolveArgs),

    /// List the domains, edges, and blocks of the system.
    Describe(DescribeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("castgraph CLI starting");

    let system = match load_system(cli.profile.as_deref()) {
        Ok(system) => system,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::Cast(args) => run_cast(&args, &system),
        Commands::Resolve(args) => run_resolve(&args, &system),
        Commands::Describe(args) => run_describe(&args, &system),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
