//! Drift - Development Tools

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drift_tools::validate::{validate_data_directory, validate_profiles_file};

#[derive(Parser)]
#[command(name = "drift-tools")]
#[command(about = "Development tools for Drift")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate all motion profile files in a data directory
    Validate {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: String,
    },

    /// Validate a single motion profile file
    Check {
        /// Path to a profile RON file
        path: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {path}");
            validate_data_directory(Path::new(&path))
        }
        Commands::Check { path } => {
            tracing::info!("Validating: {path}");
            validate_profiles_file(Path::new(&path))
        }
    };

    match result {
        Ok(count) => {
            tracing::info!("Validation passed ({count} profiles)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Validation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
