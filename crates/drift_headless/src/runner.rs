//! Headless scenario runner.
//!
//! Drives a [`Session`] through a scenario timeline without any rendering:
//! feed events are enqueued as their delivery times come up, the session
//! ticks at the scenario cadence, and metrics are collected along the way.
//! Optionally emits a JSON line per tick for CI consumption and captures
//! the whole run as a recording for offline verification.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use drift_core::error::MotionError;
use drift_core::kinematics::{EntityId, Millis};
use drift_core::recording::{Recorder, RecordingPlayer};
use drift_core::session::Session;

use crate::metrics::{EntityReport, RunMetrics};
use crate::scenario::{Scenario, ScenarioError};

/// Error type for headless runs.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Scenario could not be loaded or is inconsistent.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// Simulation-side failure (duplicate ids, unknown classes).
    #[error(transparent)]
    Motion(#[from] MotionError),
    /// The captured recording did not replay to the same final hash.
    #[error("Recording verification failed for scenario '{0}'")]
    RecordingMismatch(String),
}

/// Runner configuration.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Emit one JSON line of entity state per tick on stdout.
    pub json_output: bool,
    /// Capture the run and save the recording here.
    pub record: Option<PathBuf>,
}

/// Per-tick state output in JSON mode.
#[derive(Debug, Serialize)]
struct TickOutput {
    now: Millis,
    entities: Vec<EntityOutput>,
}

/// One entity's state in JSON mode.
#[derive(Debug, Serialize)]
struct EntityOutput {
    id: EntityId,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    heading: f32,
    speed: f32,
}

/// Drives one session through one scenario.
#[derive(Debug)]
pub struct Runner {
    scenario: Scenario,
    config: RunConfig,
}

impl Runner {
    /// Create a runner for the given scenario.
    #[must_use]
    pub fn new(scenario: Scenario, config: RunConfig) -> Self {
        Self { scenario, config }
    }

    /// Run the scenario to completion and return the collected metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario is inconsistent, an entity cannot
    /// be created, or recording capture/verification fails.
    pub fn run(&self) -> Result<RunMetrics, RunnerError> {
        self.scenario.validate()?;

        let registry = self.scenario.registry();
        let mut session = Session::new();
        let mut recorder = self.config.record.as_ref().map(|_| Recorder::new());

        // Class names and observed peaks per entity, kept outside the
        // session so reports survive mid-run removals.
        let mut classes: Vec<(EntityId, String, f32)> = Vec::new();
        let mut max_observed: Vec<(EntityId, f32)> = Vec::new();

        for entity in &self.scenario.entities {
            let profile = registry.require(&entity.class)?;
            let state = entity.initial_state()?;
            session.create_entity(entity.id, profile, state)?;

            if let Some(recorder) = recorder.as_mut() {
                recorder.record_initial(entity.id, profile, state);
            }
            classes.push((entity.id, entity.class.clone(), profile.limits.max_speed));
            max_observed.push((entity.id, state.speed()));
        }

        let mut metrics = RunMetrics::new(self.scenario.name.clone());
        let feed = self.scenario.sorted_feed();
        let mut next_feed = 0usize;

        let mut now = self.scenario.tick_interval;
        while now <= self.scenario.duration {
            while next_feed < feed.len() && feed[next_feed].at <= now {
                let event = feed[next_feed].event.clone();
                if let Some(recorder) = recorder.as_mut() {
                    recorder.record_event(&event);
                }
                session.enqueue(event);
                next_feed += 1;
            }

            let events = session.tick(now);
            if let Some(recorder) = recorder.as_mut() {
                recorder.record_tick(now);
            }

            metrics.ticks += 1;
            metrics.snapshots_applied += events.applied.len() as u64;
            metrics.updates_dropped += events.dropped.len() as u64;
            metrics.entities_removed += events.removed.len() as u64;

            for (id, peak) in &mut max_observed {
                if let Some(state) = session.state(*id) {
                    *peak = peak.max(state.speed());
                }
            }

            if self.config.json_output {
                self.emit_tick(&session, now);
            }

            now += self.scenario.tick_interval;
        }

        metrics.undelivered_events = (feed.len() - next_feed) as u64;
        if metrics.undelivered_events > 0 {
            tracing::warn!(
                count = metrics.undelivered_events,
                "feed events scheduled past scenario end were never delivered"
            );
        }

        metrics.final_state_hash = session.state_hash();
        metrics.entities = self.final_reports(&session, &classes, &max_observed);

        if let (Some(recorder), Some(path)) = (recorder.take(), self.config.record.as_ref()) {
            let recording = recorder.finish(metrics.final_state_hash);

            // The capture must replay to the hash it claims before it is
            // persisted.
            let mut player = RecordingPlayer::new(recording.clone())?;
            if !player.verify()? {
                return Err(RunnerError::RecordingMismatch(self.scenario.name.clone()));
            }

            recording.save(path)?;
            tracing::info!(path = %path.display(), "recording saved");
        }

        Ok(metrics)
    }

    /// Build per-entity final reports in id order.
    fn final_reports(
        &self,
        session: &Session,
        classes: &[(EntityId, String, f32)],
        max_observed: &[(EntityId, f32)],
    ) -> Vec<EntityReport> {
        let mut reports: Vec<EntityReport> = classes
            .iter()
            .filter_map(|(id, class, speed_limit)| {
                let state = session.state(*id)?;
                let peak = max_observed
                    .iter()
                    .find(|(pid, _)| pid == id)
                    .map_or(0.0, |(_, peak)| *peak);

                Some(EntityReport {
                    id: *id,
                    class: class.clone(),
                    x: state.position.x,
                    y: state.position.y,
                    speed: state.speed(),
                    max_observed_speed: peak,
                    speed_limit: *speed_limit,
                })
            })
            .collect();

        reports.sort_by_key(|r| r.id);
        reports
    }

    /// Emit one JSON line of entity state.
    fn emit_tick(&self, session: &Session, now: Millis) {
        let entities = session
            .sorted_ids()
            .into_iter()
            .filter_map(|id| {
                let state = session.state(id)?;
                Some(EntityOutput {
                    id,
                    x: state.position.x,
                    y: state.position.y,
                    vx: state.velocity.x,
                    vy: state.velocity.y,
                    heading: state.heading,
                    speed: state.speed(),
                })
            })
            .collect();

        let output = TickOutput { now, entities };
        match serde_json::to_string(&output) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize tick output"),
        }
    }
}
