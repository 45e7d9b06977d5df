//! Test fixtures and helpers.
//!
//! Pre-built limits, profiles, states, and snapshot builders for
//! consistent testing across crates.

use drift_core::kinematics::{EntityId, EntityLimits, KinematicState, Millis, RotationDir};
use drift_core::math::Vec2;
use drift_core::profiles::{MotionModel, MotionProfile};
use drift_core::receiver::RawSnapshot;

/// Canonical tuning used throughout the test suite:
/// max speed 2.0 units/ms, thrust 0.001 units/ms², rotation 0.002 rad/ms.
#[must_use]
pub fn standard_limits() -> EntityLimits {
    EntityLimits {
        max_speed: 2.0,
        thrust_acceleration: 0.001,
        rotation_speed: 0.002,
    }
}

/// Powered motion profile using [`standard_limits`].
#[must_use]
pub fn powered_profile() -> MotionProfile {
    MotionProfile {
        model: MotionModel::Powered,
        limits: standard_limits(),
    }
}

/// Ballistic motion profile using [`standard_limits`].
#[must_use]
pub fn ballistic_profile() -> MotionProfile {
    MotionProfile {
        model: MotionModel::Ballistic,
        limits: standard_limits(),
    }
}

/// A state at the origin with thrust engaged and no rotation.
#[must_use]
pub fn thrusting_state(time: Millis) -> KinematicState {
    KinematicState {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        heading: 0.0,
        rotation: RotationDir::None,
        thrust_active: true,
        last_update: time,
    }
}

/// A state at the origin coasting at the given velocity, thrust off.
#[must_use]
pub fn drifting_state(velocity: Vec2, time: Millis) -> KinematicState {
    KinematicState {
        position: Vec2::ZERO,
        velocity,
        heading: 0.0,
        rotation: RotationDir::None,
        thrust_active: false,
        last_update: time,
    }
}

/// A complete, valid raw snapshot at rest at the origin.
///
/// Tests strip or override individual fields from this baseline.
#[must_use]
pub fn raw_snapshot(entity_id: EntityId, server_timestamp: Millis) -> RawSnapshot {
    RawSnapshot {
        entity_id: Some(entity_id),
        x: Some(0.0),
        y: Some(0.0),
        vx: Some(0.0),
        vy: Some(0.0),
        heading: Some(0.0),
        thrust: Some(false),
        rotation: Some(0),
        server_timestamp: Some(server_timestamp),
    }
}
