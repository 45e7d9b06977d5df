//! Property-based testing strategies.
//!
//! Generators for kinematic states, limits, and step counts kept inside the
//! ranges the simulation is designed for (finite values, non-degenerate
//! limits), so properties fail for real reasons rather than for inputs the
//! boundary validation would have rejected.

use drift_core::kinematics::{EntityLimits, KinematicState, RotationDir};
use drift_core::math::Vec2;
use drift_core::receiver::RawSnapshot;
use proptest::prelude::*;

/// A finite coordinate within a plausible playfield.
pub fn arb_coord() -> impl Strategy<Value = f32> {
    -10_000.0f32..10_000.0
}

/// A velocity component within sane per-millisecond bounds.
pub fn arb_velocity_component() -> impl Strategy<Value = f32> {
    -5.0f32..5.0
}

/// Any turn direction.
pub fn arb_rotation_dir() -> impl Strategy<Value = RotationDir> {
    prop_oneof![
        Just(RotationDir::Ccw),
        Just(RotationDir::None),
        Just(RotationDir::Cw),
    ]
}

/// An arbitrary kinematic state.
pub fn arb_state() -> impl Strategy<Value = KinematicState> {
    (
        (arb_coord(), arb_coord()),
        (arb_velocity_component(), arb_velocity_component()),
        -std::f32::consts::PI..std::f32::consts::PI,
        arb_rotation_dir(),
        any::<bool>(),
        0i64..1_000_000,
    )
        .prop_map(|(pos, vel, heading, rotation, thrust_active, last_update)| {
            KinematicState {
                position: Vec2::new(pos.0, pos.1),
                velocity: Vec2::new(vel.0, vel.1),
                heading,
                rotation,
                thrust_active,
                last_update,
            }
        })
}

/// Non-degenerate entity limits.
pub fn arb_limits() -> impl Strategy<Value = EntityLimits> {
    (0.1f32..5.0, 0.0f32..0.01, 0.0f32..0.01).prop_map(
        |(max_speed, thrust_acceleration, rotation_speed)| EntityLimits {
            max_speed,
            thrust_acceleration,
            rotation_speed,
        },
    )
}

/// A non-negative step count bounded to keep test runtime sane.
pub fn arb_steps() -> impl Strategy<Value = i64> {
    0i64..2_000
}

/// A complete, valid raw snapshot for the given entity.
pub fn arb_raw_snapshot(entity_id: u64) -> impl Strategy<Value = RawSnapshot> {
    (
        (arb_coord(), arb_coord()),
        (arb_velocity_component(), arb_velocity_component()),
        -std::f32::consts::PI..std::f32::consts::PI,
        any::<bool>(),
        -1i8..=1,
        0i64..1_000_000,
    )
        .prop_map(move |(pos, vel, heading, thrust, rotation, timestamp)| RawSnapshot {
            entity_id: Some(entity_id),
            x: Some(pos.0),
            y: Some(pos.1),
            vx: Some(vel.0),
            vy: Some(vel.1),
            heading: Some(heading),
            thrust: Some(thrust),
            rotation: Some(rotation),
            server_timestamp: Some(timestamp),
        })
}
