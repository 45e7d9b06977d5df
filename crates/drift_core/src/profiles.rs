//! Data-driven per-class motion tuning.
//!
//! Entity classes (ship types, projectile types) are defined in RON data
//! files with tuning in per-second units and resolved at load time into the
//! per-millisecond [`EntityLimits`] the integrator consumes.
//!
//! This module only parses from strings; file and directory loading is
//! handled by the headless runner and the data validation tools.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::kinematics::EntityLimits;

/// How an entity class moves between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MotionModel {
    /// Full physics replay: rotation, thrust, speed clamp, integration.
    #[default]
    Powered,
    /// Straight-line replay: position integration only, no forces.
    ///
    /// Used for fire-and-forget objects whose velocity never changes after
    /// launch (weapon shots and the like).
    Ballistic,
}

/// Data-driven motion class definition.
///
/// Tuning values use per-second units for readability; [`ProfileData::resolve`]
/// converts them into the per-millisecond units used by the integrator.
///
/// # Example RON
///
/// ```ron
/// [
///     ProfileData(
///         id: "astro",
///         motion: Powered,
///         max_speed: 200.0,       // units/s
///         thrust_accel: 1000.0,   // units/s²
///         rotation_speed: 120.0,  // deg/s
///     ),
///     ProfileData(
///         id: "plasma_bolt",
///         motion: Ballistic,
///         max_speed: 400.0,
///     ),
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    /// Unique string identifier for this class.
    pub id: String,

    /// Motion model for this class.
    #[serde(default)]
    pub motion: MotionModel,

    /// Maximum speed in units per second.
    pub max_speed: f32,

    /// Thrust acceleration in units per second squared.
    ///
    /// Ignored for ballistic classes.
    #[serde(default)]
    pub thrust_accel: f32,

    /// Rotation speed in degrees per second.
    ///
    /// Ignored for ballistic classes.
    #[serde(default)]
    pub rotation_speed: f32,
}

impl ProfileData {
    /// Resolve this definition into a runtime profile.
    #[must_use]
    pub fn resolve(&self) -> MotionProfile {
        MotionProfile {
            model: self.motion,
            limits: EntityLimits::from_per_second(
                self.max_speed,
                self.thrust_accel,
                self.rotation_speed,
            ),
        }
    }
}

/// Resolved runtime motion profile for one entity class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Motion model.
    pub model: MotionModel,
    /// Per-millisecond limits.
    pub limits: EntityLimits,
}

/// Registry of motion profiles keyed by class id.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, MotionProfile>,
}

impl ProfileRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from RON source.
    ///
    /// `source` names the origin (file path or `"<inline>"`) for error
    /// reporting only.
    pub fn from_ron_str(source: &str, content: &str) -> Result<Self> {
        let data: Vec<ProfileData> = ron::from_str(content).map_err(|e| MotionError::DataParse {
            path: source.to_string(),
            message: e.to_string(),
        })?;

        let mut registry = Self::new();
        for profile in &data {
            registry.insert(profile);
        }
        Ok(registry)
    }

    /// Insert (or replace) a profile definition.
    pub fn insert(&mut self, data: &ProfileData) {
        self.profiles.insert(data.id.clone(), data.resolve());
    }

    /// Look up a profile by class id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<MotionProfile> {
        self.profiles.get(id).copied()
    }

    /// Look up a profile, returning an error naming the missing class.
    pub fn require(&self, id: &str) -> Result<MotionProfile> {
        self.get(id)
            .ok_or_else(|| MotionError::UnknownProfile(id.to_string()))
    }

    /// Number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
