//! Headless scenario runner for CI verification and determinism testing.
//!
//! This crate drives [`drift_core`] sessions through scripted scenarios
//! without graphics or a live transport. This enables:
//!
//! - **CI verification**: scenario runs with metrics and exit codes
//! - **Determinism testing**: parallel batch runs compared by state hash
//! - **Replay verification**: captured recordings checked bit for bit
//!
//! # Example
//!
//! ```bash
//! # Run the built-in demo scenario
//! cargo run -p drift_headless -- run
//!
//! # Run a scenario file with JSON-lines state output
//! cargo run -p drift_headless -- run --scenario scenarios/intercept.ron --json
//!
//! # Capture a recording, then verify it later
//! cargo run -p drift_headless -- run --record run.drec
//! cargo run -p drift_headless -- verify --recording run.drec
//!
//! # Determinism batch
//! cargo run -p drift_headless -- batch --count 500
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod batch;
pub mod metrics;
pub mod runner;
pub mod scenario;

pub use batch::{run_batch, BatchConfig, BatchResults};
pub use metrics::{EntityReport, RunMetrics};
pub use runner::{RunConfig, Runner, RunnerError};
pub use scenario::{FeedItem, Scenario, ScenarioEntity, ScenarioError};
