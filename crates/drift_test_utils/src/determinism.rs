//! Determinism testing utilities.
//!
//! Provides a harness for verifying that motion extrapolation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Dead reckoning reproduces the authoritative physics client-side, so the
//! whole design rests on the simulation being reproducible. Sources of
//! non-determinism to guard against:
//!
//! - **Iteration order**: Rust's default hasher is randomized, so entity
//!   maps are always iterated in sorted id order.
//! - **Time sources**: the simulation never reads a clock; all timestamps
//!   are inputs.
//! - **Cross-run float variation**: a fixed sequence of `f32` operations is
//!   reproducible on a given target; the harness verifies exactly that.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual integration steps are deterministic
//! 2. **Property tests**: random inputs must still produce deterministic outputs
//! 3. **Scenario tests**: full session feeds are reproducible
//! 4. **Parallel tests**: running N sessions in parallel all match

use drift_core::kinematics::Millis;
use drift_core::session::Session;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            tracing::warn!(runs = self.hashes.len(), unique = unique.len(), "non-deterministic runs");
            panic!(
                "Runs are non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a setup/step cycle multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `ticks` - Number of step invocations per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state once
/// * `hash` - Function to compute a state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, u64),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for tick in 0..ticks {
            step(&mut state, tick);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Simplified determinism verification for [`Session`] feeds.
///
/// Builds the session twice with identical setup, ticks it through the same
/// timeline, and verifies the final state hashes match exactly.
pub fn verify_session_determinism<F>(setup: F, tick_times: &[Millis]) -> bool
where
    F: Fn() -> Session,
{
    let times = tick_times.to_vec();
    let result = verify_determinism(
        2,
        times.len() as u64,
        setup,
        move |session, tick| {
            let _ = session.tick(times[tick as usize]);
        },
        Session::state_hash,
    );
    result.is_deterministic
}

/// Result of parallel session runs.
#[derive(Debug, Clone)]
pub struct ParallelRunResult {
    /// Final state hash from each session.
    pub hashes: Vec<u64>,
    /// Number of ticks each session ran.
    pub ticks: u64,
    /// Number of sessions run.
    pub num_sessions: usize,
}

impl ParallelRunResult {
    /// Check if all sessions produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all sessions matched.
    ///
    /// # Panics
    ///
    /// Panics if sessions produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel sessions diverged!\n\
                 Sessions: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_sessions,
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run N identical sessions in parallel and collect final hashes.
///
/// Entities never share mutable state, so sessions are trivially
/// parallelizable; this catches non-determinism that only manifests under
/// thread scheduling variation.
pub fn run_parallel_sessions<F>(
    setup: F,
    num_sessions: usize,
    tick_times: &[Millis],
) -> ParallelRunResult
where
    F: Fn() -> Session + Send + Sync,
{
    let setup_ref = &setup;

    let hashes = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..num_sessions)
            .map(|_| {
                scope.spawn(move || {
                    let mut session = setup_ref();
                    for &now in tick_times {
                        let _ = session.tick(now);
                    }
                    session.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("session thread panicked"))
            .collect::<Vec<u64>>()
    });

    ParallelRunResult {
        hashes,
        ticks: tick_times.len() as u64,
        num_sessions,
    }
}
