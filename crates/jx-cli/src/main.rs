//! jx runtime configuration bootstrap CLI
//!
//! Resolves the layered configuration for a described process, applies it
//! to an in-process host, and reports the outcome.

mod cli;
mod error;
mod report;

use clap::Parser;
use colored::Colorize;
use jx_config::{InProcessHost, STARTUP_DIAGNOSTIC, bootstrap};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::Result;
use report::BootstrapReport;

fn main() {
    if let Err(e) = run() {
        if e.is_fatal_source() {
            eprintln!("{}", STARTUP_DIAGNOSTIC);
        }
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = cli.process_context()?;
    tracing::debug!(?context, "Bootstrapping");

    let mut host = InProcessHost::new();
    match bootstrap(&context, &mut host)? {
        Some(resolution) => BootstrapReport::new(&resolution, &host).print(cli.json),
        None => {
            if cli.json {
                println!("null");
            } else {
                println!(
                    "{} configuration bootstrap does not run for this deployment",
                    "skipped".yellow().bold()
                );
            }
            Ok(())
        }
    }
}

/// Log to stderr; `--verbose` forces DEBUG, otherwise `RUST_LOG` or `warn`.
fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    if verbose && result.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}
