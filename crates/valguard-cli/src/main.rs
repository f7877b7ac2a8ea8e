//! # valguard CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use valguard_cli::check::{run_check, CheckArgs};
use valguard_cli::config::CliConfig;
use valguard_cli::mutate::{run_mutate, MutateArgs};

/// valguard: values that stay valid.
///
/// Checks documents against a JSON Schema and applies writes that are
/// revalidated against the whole document before they take effect.
#[derive(Parser, Debug)]
#[command(name = "valguard", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Expose record outputs wrapped as `{ "value": .. }`.
    /// `--wrap-value=false` overrides a config file that enables it.
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    wrap_value: Option<bool>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema.
    Check(CheckArgs),

    /// Apply validated writes to a document.
    Mutate(MutateArgs),
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

    tracing::debug!("valguard CLI starting");

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| {
        let config = config.with_wrap_value(cli.wrap_value);
        let mut stdout = std::io::stdout().lock();
        match &cli.command {
            Commands::Check(args) => run_check(args, config.options(), &mut stdout),
            Commands::Mutate(args) => {
                let strict = args.strict || config.strict;
                run_mutate(args, config.options(), strict, &mut stdout)
            }
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
