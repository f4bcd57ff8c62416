use anyhow::Result;
use sigmap::cli::Commands;
use sigmap::commands::{self, ScanCommandConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = sigmap::cli::parse_args();
    init_tracing(verbosity_of(&cli.command));

    match cli.command {
        Commands::Scan {
            path,
            format,
            output,
            config,
            input_json,
            strict,
            ignore,
            no_parallel,
            color,
            quiet,
            verbosity: _,
        } => {
            let outcome = commands::handle_scan(ScanCommandConfig {
                path,
                format,
                output,
                config,
                input_json,
                strict,
                ignore: ignore.unwrap_or_default(),
                no_parallel,
                color,
                quiet,
            })?;
            if outcome.failed {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init_config(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn verbosity_of(command: &Commands) -> u8 {
    match command {
        Commands::Scan { verbosity, .. } => *verbosity,
        Commands::Init { .. } => 0,
    }
}

/// RUST_LOG wins; otherwise `-v` flags pick the level.
fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("sigmap={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
