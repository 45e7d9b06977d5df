//! Scenario loading and configuration.
//!
//! Scenarios define a reproducible session run for headless testing: the
//! motion profiles in play, the entities tracked at start, and a scripted
//! timeline of transport events (including deliberately malformed ones, for
//! exercising the drop paths).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use drift_core::kinematics::{EntityId, KinematicState, Millis, RotationDir};
use drift_core::math::Vec2;
use drift_core::profiles::{MotionModel, ProfileData, ProfileRegistry};
use drift_core::receiver::{RawSnapshot, TransportEvent};

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Scenario contents are inconsistent.
    #[error("Invalid scenario: {0}")]
    Invalid(String),
}

/// An entity tracked from the start of the scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEntity {
    /// Entity id.
    pub id: EntityId,
    /// Motion class id, resolved against the scenario's profiles.
    pub class: String,
    /// Starting x position.
    pub x: f32,
    /// Starting y position.
    pub y: f32,
    /// Starting x velocity, units/ms.
    #[serde(default)]
    pub vx: f32,
    /// Starting y velocity, units/ms.
    #[serde(default)]
    pub vy: f32,
    /// Starting heading, radians.
    #[serde(default)]
    pub heading: f32,
    /// Whether the thruster starts engaged.
    #[serde(default)]
    pub thrust: bool,
    /// Starting turn direction, wire-encoded (-1, 0, +1).
    #[serde(default)]
    pub rotation: i8,
}

impl ScenarioEntity {
    /// Build the entity's initial kinematic state.
    pub fn initial_state(&self) -> Result<KinematicState, ScenarioError> {
        let rotation = RotationDir::from_raw(self.rotation).ok_or_else(|| {
            ScenarioError::Invalid(format!(
                "entity {} has rotation {} (expected -1, 0 or 1)",
                self.id, self.rotation
            ))
        })?;

        Ok(KinematicState {
            position: Vec2::new(self.x, self.y),
            velocity: Vec2::new(self.vx, self.vy),
            heading: self.heading,
            rotation,
            thrust_active: self.thrust,
            last_update: 0,
        })
    }
}

/// A transport event scheduled for delivery at a point in the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    /// Local time the event arrives (enqueued before the first tick at or
    /// after this time).
    pub at: Millis,
    /// The event itself.
    pub event: TransportEvent,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Milliseconds between host ticks.
    pub tick_interval: Millis,
    /// Total run length in milliseconds.
    pub duration: Millis,
    /// Motion classes available to this scenario.
    pub profiles: Vec<ProfileData>,
    /// Entities tracked from the start.
    pub entities: Vec<ScenarioEntity>,
    /// Scripted transport events.
    #[serde(default)]
    pub feed: Vec<FeedItem>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "two_ship_drift".to_string(),
            description: "Two powered ships and one shot, fed staggered snapshots".to_string(),
            tick_interval: 16,
            duration: 2_000,
            profiles: vec![
                ProfileData {
                    id: "ship".to_string(),
                    motion: MotionModel::Powered,
                    max_speed: 200.0,
                    thrust_accel: 1_000.0,
                    rotation_speed: 120.0,
                },
                ProfileData {
                    id: "shot".to_string(),
                    motion: MotionModel::Ballistic,
                    max_speed: 400.0,
                    thrust_accel: 0.0,
                    rotation_speed: 0.0,
                },
            ],
            entities: vec![
                ScenarioEntity {
                    id: 1,
                    class: "ship".to_string(),
                    x: 0.0,
                    y: 0.0,
                    vx: 0.0,
                    vy: 0.0,
                    heading: 0.0,
                    thrust: true,
                    rotation: 0,
                },
                ScenarioEntity {
                    id: 2,
                    class: "ship".to_string(),
                    x: 300.0,
                    y: 120.0,
                    vx: -0.05,
                    vy: 0.0,
                    heading: std::f32::consts::PI,
                    thrust: false,
                    rotation: 0,
                },
                ScenarioEntity {
                    id: 3,
                    class: "shot".to_string(),
                    x: 10.0,
                    y: 0.0,
                    vx: 0.3,
                    vy: 0.1,
                    heading: 0.0,
                    thrust: false,
                    rotation: 0,
                },
            ],
            feed: vec![
                FeedItem {
                    at: 400,
                    event: TransportEvent::Snapshot(RawSnapshot {
                        entity_id: Some(2),
                        x: Some(280.0),
                        y: Some(120.0),
                        vx: Some(-0.08),
                        vy: Some(0.0),
                        heading: Some(std::f32::consts::PI),
                        thrust: Some(true),
                        rotation: Some(0),
                        server_timestamp: Some(350),
                    }),
                },
                FeedItem {
                    at: 900,
                    event: TransportEvent::Control(drift_core::receiver::ControlUpdate {
                        entity_id: Some(1),
                        thrust: None,
                        rotation: Some(1),
                    }),
                },
                FeedItem {
                    at: 1_500,
                    event: TransportEvent::EntityRemoved(3),
                },
            ],
        }
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check internal consistency (positive cadence, known classes,
    /// well-formed initial states).
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.tick_interval <= 0 {
            return Err(ScenarioError::Invalid(format!(
                "tick_interval must be positive, got {}",
                self.tick_interval
            )));
        }
        if self.duration < 0 {
            return Err(ScenarioError::Invalid(format!(
                "duration must be non-negative, got {}",
                self.duration
            )));
        }

        let registry = self.registry();
        for entity in &self.entities {
            if registry.get(&entity.class).is_none() {
                return Err(ScenarioError::Invalid(format!(
                    "entity {} references unknown class '{}'",
                    entity.id, entity.class
                )));
            }
            entity.initial_state()?;
        }

        Ok(())
    }

    /// Build the profile registry for this scenario.
    #[must_use]
    pub fn registry(&self) -> ProfileRegistry {
        let mut registry = ProfileRegistry::new();
        for profile in &self.profiles {
            registry.insert(profile);
        }
        registry
    }

    /// Feed items sorted by delivery time, preserving script order for
    /// items that share a timestamp.
    #[must_use]
    pub fn sorted_feed(&self) -> Vec<FeedItem> {
        let mut feed = self.feed.clone();
        feed.sort_by_key(|item| item.at);
        feed
    }
}
