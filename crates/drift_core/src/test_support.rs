//! Test fixtures and property strategies for drift_core's own unit tests.
//!
//! These are local copies of the helpers in `drift_test_utils`, kept inside
//! the crate so the inline `#[cfg(test)]` modules do not pull a second copy
//! of `drift_core` into the lib-test build (which would make fixture-produced
//! types fail to unify with the lib-under-test's types). `drift_test_utils`
//! remains the shared source for integration tests in the other crates.

/// Test fixtures and helpers: pre-built limits, profiles, states, and
/// snapshot builders.
pub mod fixtures {
    use crate::kinematics::{EntityId, EntityLimits, KinematicState, Millis, RotationDir};
    use crate::math::Vec2;
    use crate::profiles::{MotionModel, MotionProfile};
    use crate::receiver::RawSnapshot;

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
}

/// Property-based testing strategies.
pub mod strategies {
    use crate::kinematics::{EntityLimits, KinematicState, RotationDir};
    use crate::math::Vec2;
    use crate::receiver::RawSnapshot;
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
}
