//! Per-entity kinematic state and tuning limits.
//!
//! A [`KinematicState`] is exclusively owned by the session tracking that
//! entity; snapshots are transient inputs, never aliased or stored beyond
//! the update call that consumes them.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Unique identifier for entities.
pub type EntityId = u64;

/// Simulation timestamp in integer milliseconds.
///
/// Signed so that clock skew between the local and remote clocks can be
/// detected and clamped rather than wrapping.
pub type Millis = i64;

/// Current turn direction of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationDir {
    /// Turning counterclockwise (decreasing heading factor -1).
    Ccw,
    /// Not rotating.
    #[default]
    None,
    /// Turning clockwise (increasing heading factor +1).
    Cw,
}

impl RotationDir {
    /// Heading multiplier applied per integration step.
    #[must_use]
    pub fn factor(self) -> f32 {
        match self {
            Self::Ccw => -1.0,
            Self::None => 0.0,
            Self::Cw => 1.0,
        }
    }

    /// Convert from the raw wire encoding (-1, 0, +1).
    ///
    /// Returns `None` for any other value; callers treat that as a
    /// malformed update.
    #[must_use]
    pub fn from_raw(raw: i8) -> Option<Self> {
        match raw {
            -1 => Some(Self::Ccw),
            0 => Some(Self::None),
            1 => Some(Self::Cw),
            _ => None,
        }
    }

    /// Raw wire encoding of this direction.
    #[must_use]
    pub fn as_raw(self) -> i8 {
        match self {
            Self::Ccw => -1,
            Self::None => 0,
            Self::Cw => 1,
        }
    }
}

/// Immutable per-class motion limits.
///
/// All values are expressed in per-millisecond units because the integrator
/// advances in discrete 1 ms steps. Configuration files use the friendlier
/// per-second units; see [`EntityLimits::from_per_second`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityLimits {
    /// Maximum speed in simulation units per millisecond.
    pub max_speed: f32,
    /// Thrust acceleration in simulation units per millisecond squared.
    pub thrust_acceleration: f32,
    /// Rotation speed in radians per millisecond.
    pub rotation_speed: f32,
}

impl EntityLimits {
    /// Convert per-second tuning units into per-millisecond simulation units.
    ///
    /// * `max_speed` - units/s (divided by 1 000)
    /// * `thrust_accel` - units/s² (divided by 1 000 000)
    /// * `rotation_speed` - degrees/s (converted to rad/ms)
    #[must_use]
    pub fn from_per_second(max_speed: f32, thrust_accel: f32, rotation_speed: f32) -> Self {
        Self {
            max_speed: max_speed / 1_000.0,
            thrust_acceleration: thrust_accel / 1_000_000.0,
            rotation_speed: rotation_speed.to_radians() / 1_000.0,
        }
    }
}

/// Control inputs produced by local input handling.
///
/// The session applies these to a locally-owned entity between snapshots;
/// the same shape also arrives from the authoritative source as a
/// lightweight rotation/thrust change that does not re-seed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlIntent {
    /// Whether the thruster is engaged.
    pub thrust: bool,
    /// Current turn direction.
    pub rotation: RotationDir,
}

/// Complete kinematic state of one simulated entity.
///
/// Invariant: `|velocity| <= max_speed` after every powered simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// Position in simulation-space coordinates (not screen pixels).
    pub position: Vec2,
    /// Velocity in simulation units per millisecond.
    pub velocity: Vec2,
    /// Heading in radians. Accumulates without normalization, as the
    /// authoritative physics does; renderers reduce modulo 2π.
    pub heading: f32,
    /// Current turn direction.
    pub rotation: RotationDir,
    /// Whether the thruster is engaged.
    pub thrust_active: bool,
    /// Timestamp this state was last advanced to.
    pub last_update: Millis,
}

impl KinematicState {
    /// Create a state at rest at the given position and time.
    #[must_use]
    pub fn at_rest(position: Vec2, time: Millis) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            heading: 0.0,
            rotation: RotationDir::None,
            thrust_active: false,
            last_update: time,
        }
    }

    /// Current speed (velocity magnitude) in units per millisecond.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Clamp velocity to the given maximum speed, preserving direction.
    ///
    /// Direction is recovered with `atan2(vy, vx)` and the vector rebuilt at
    /// the limit magnitude, mirroring the authoritative implementation.
    pub fn limit_speed(&mut self, max_speed: f32) {
        if self.speed() > max_speed {
            let dir = self.velocity.direction();
            self.velocity = Vec2::new(dir.cos() * max_speed, dir.sin() * max_speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_dir_raw_roundtrip() {
        for dir in [RotationDir::Ccw, RotationDir::None, RotationDir::Cw] {
            assert_eq!(RotationDir::from_raw(dir.as_raw()), Some(dir));
        }
        assert_eq!(RotationDir::from_raw(2), None);
        assert_eq!(RotationDir::from_raw(-2), None);
    }

    #[test]
    fn test_limits_unit_conversion() {
        // 150 px/s, 1000 px/s², 90 deg/s
        let limits = EntityLimits::from_per_second(150.0, 1000.0, 90.0);
        assert!((limits.max_speed - 0.15).abs() < 1e-6);
        assert!((limits.thrust_acceleration - 0.001).abs() < 1e-9);
        assert!((limits.rotation_speed - std::f32::consts::FRAC_PI_2 / 1000.0).abs() < 1e-8);
    }

    #[test]
    fn test_limit_speed_preserves_direction() {
        let mut state = KinematicState::at_rest(Vec2::ZERO, 0);
        state.velocity = Vec2::new(3.0, 4.0);
        state.limit_speed(2.5);

        assert!((state.speed() - 2.5).abs() < 1e-5);
        // Direction preserved: 3-4-5 triangle ratios
        assert!((state.velocity.x / state.velocity.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_limit_speed_noop_below_limit() {
        let mut state = KinematicState::at_rest(Vec2::ZERO, 0);
        state.velocity = Vec2::new(0.5, 0.5);
        let before = state.velocity;
        state.limit_speed(2.0);
        assert_eq!(state.velocity, before);
    }
}
