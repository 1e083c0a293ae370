//! clinic: demo command-line front end for the clinic service.
//!
//! Seeds in-memory repositories (bundled demo data, or `SEED_PATH`) and runs a
//! single command against them. Nothing is persisted across runs.
//!
//! Run:
//! ```bash
//! cargo run -p clinic-cli -- owners Davis
//! LOG_FORMAT=json RUST_LOG=debug cargo run -p clinic-cli -- adopt 1 Fluffy --type cat
//! ```
//!
//! Configuration: see `config.rs`.

mod commands;
mod config;
mod error;
mod seed;

use std::io;
use std::process;

use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::{execute, Command};
use crate::error::CliError;
use crate::seed::Seed;

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  clinic owner <owner-id>\n  clinic owners [last-name-prefix]\n  clinic vets\n  clinic visits <pet-id>\n  clinic adopt <owner-id> <pet-name> [--type <pet-type>]\n\nEnvironment:\n  SEED_PATH   JSON seed file (default: bundled demo clinic)\n  LOG_FORMAT  pretty | json\n  RUST_LOG    log filter (default: info)",
        clinic_domain::about()
    );
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so command output on stdout stays clean.
    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(io::stderr),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}

fn run(cfg: &config::Config) -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args)? else {
        print_usage();
        return Ok(());
    };

    let seed = match &cfg.seed_path {
        Some(path) => Seed::load(path)?,
        None => Seed::demo()?,
    };
    let svc = seed.install()?;

    let stdout = io::stdout();
    execute(&svc, command, &mut stdout.lock())
}

fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    init_tracing(&cfg);

    if let Err(e) = run(&cfg) {
        error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
