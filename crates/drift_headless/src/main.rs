//! Drift - Headless scenario runner.
//!
//! Runs motion-extrapolation scenarios without graphics, for CI testing and
//! replay verification. See the crate docs for usage examples.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drift_core::recording::{Recording, RecordingPlayer};
use drift_headless::{run_batch, BatchConfig, RunConfig, Runner, Scenario};

#[derive(Parser)]
#[command(name = "drift_headless")]
#[command(about = "Headless motion-extrapolation runner for CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single scenario
    Run {
        /// Scenario file to load (built-in demo scenario if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Emit one JSON line of entity state per tick on stdout
        #[arg(long)]
        json: bool,

        /// Capture the run as a recording at this path
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Replay a recording and verify its final state hash
    Verify {
        /// Recording file to verify
        #[arg(short, long)]
        recording: PathBuf,
    },

    /// Run a scenario many times and compare final hashes
    Batch {
        /// Scenario file to load (built-in demo scenario if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of runs
        #[arg(short, long, default_value = "100")]
        count: usize,
    },
}

fn load_scenario(path: Option<&PathBuf>) -> Result<Scenario, drift_headless::ScenarioError> {
    match path {
        Some(path) => Scenario::load(path),
        None => Ok(Scenario::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            json,
            record,
        } => {
            let scenario = match load_scenario(scenario.as_ref()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("Failed to load scenario: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let config = RunConfig {
                json_output: json,
                record,
            };
            match Runner::new(scenario, config).run() {
                Ok(metrics) => {
                    metrics.log_summary();
                    if !metrics.all_within_speed_limit() {
                        tracing::error!("speed limit exceeded during run");
                        return ExitCode::FAILURE;
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Run failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Verify { recording } => match Recording::load(&recording) {
            Ok(recording) => {
                let mut player = match RecordingPlayer::new(recording) {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::error!("Failed to seed playback: {e}");
                        return ExitCode::FAILURE;
                    }
                };
                match player.verify() {
                    Ok(true) => {
                        tracing::info!("recording verified");
                        ExitCode::SUCCESS
                    }
                    Ok(false) => {
                        tracing::error!("final state hash mismatch");
                        ExitCode::FAILURE
                    }
                    Err(e) => {
                        tracing::error!("Playback failed: {e}");
                        ExitCode::FAILURE
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to load recording: {e}");
                ExitCode::FAILURE
            }
        },

        Commands::Batch { scenario, count } => {
            let scenario = match load_scenario(scenario.as_ref()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("Failed to load scenario: {e}");
                    return ExitCode::FAILURE;
                }
            };

            match run_batch(&scenario, &BatchConfig { count }) {
                Ok(results) => {
                    if results.is_deterministic() {
                        tracing::info!(runs = count, "all runs produced identical hashes");
                        ExitCode::SUCCESS
                    } else {
                        tracing::error!(
                            unique = results.unique_hashes().len(),
                            "runs diverged"
                        );
                        ExitCode::FAILURE
                    }
                }
                Err(e) => {
                    tracing::error!("Batch failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
