//! Batch execution for determinism validation.
//!
//! Runs the same scenario many times in parallel and compares the final
//! state hashes. Sessions share nothing, so any divergence is a real
//! determinism bug rather than a scheduling artifact.

use rayon::prelude::*;

use crate::runner::{RunConfig, Runner, RunnerError};
use crate::scenario::Scenario;

/// Batch run configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of runs.
    pub count: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { count: 100 }
    }
}

/// Results of a batch run.
#[derive(Debug, Clone)]
pub struct BatchResults {
    /// Final state hash from each run.
    pub hashes: Vec<u64>,
}

impl BatchResults {
    /// Whether every run produced the same final hash.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Distinct hashes observed (1 for a deterministic scenario).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }
}

/// Run `config.count` copies of the scenario in parallel.
///
/// # Errors
///
/// Returns the first run error encountered, if any.
pub fn run_batch(scenario: &Scenario, config: &BatchConfig) -> Result<BatchResults, RunnerError> {
    let hashes = (0..config.count)
        .into_par_iter()
        .map(|_| {
            Runner::new(scenario.clone(), RunConfig::default())
                .run()
                .map(|metrics| metrics.final_state_hash)
        })
        .collect::<Result<Vec<u64>, RunnerError>>()?;

    Ok(BatchResults { hashes })
}
