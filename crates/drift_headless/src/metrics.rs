//! Run metrics collection for headless verification.

use serde::{Deserialize, Serialize};

use drift_core::kinematics::EntityId;

/// Final report for one entity at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityReport {
    /// Entity id.
    pub id: EntityId,
    /// Motion class id.
    pub class: String,
    /// Final x position.
    pub x: f32,
    /// Final y position.
    pub y: f32,
    /// Final speed, units/ms.
    pub speed: f32,
    /// Largest speed observed at any tick during the run.
    pub max_observed_speed: f32,
    /// The class speed limit, units/ms.
    pub speed_limit: f32,
}

impl EntityReport {
    /// Whether the speed-clamp invariant held for every observed tick.
    #[must_use]
    pub fn within_speed_limit(&self) -> bool {
        self.max_observed_speed <= self.speed_limit + 1e-3
    }
}

/// Complete metrics for a single scenario run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Ticks executed.
    pub ticks: u64,
    /// Snapshots applied across the run.
    pub snapshots_applied: u64,
    /// Updates dropped (malformed or unknown-entity).
    pub updates_dropped: u64,
    /// Entities removed by the feed.
    pub entities_removed: u64,
    /// Feed items scheduled after the run ended, never delivered.
    pub undelivered_events: u64,
    /// Final session state hash (for determinism validation).
    pub final_state_hash: u64,
    /// Per-entity final reports, sorted by id.
    pub entities: Vec<EntityReport>,
}

impl RunMetrics {
    /// Create metrics for the named scenario.
    #[must_use]
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            ..Default::default()
        }
    }

    /// Whether every entity stayed within its class speed limit.
    #[must_use]
    pub fn all_within_speed_limit(&self) -> bool {
        self.entities.iter().all(EntityReport::within_speed_limit)
    }

    /// Log a one-line summary at info level.
    pub fn log_summary(&self) {
        tracing::info!(
            scenario = %self.scenario,
            ticks = self.ticks,
            applied = self.snapshots_applied,
            dropped = self.updates_dropped,
            removed = self.entities_removed,
            hash = self.final_state_hash,
            "run complete"
        );
    }
}
