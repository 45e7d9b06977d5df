//! Fixed-step motion integration.
//!
//! The integrator advances one entity's kinematic state in discrete 1 ms
//! steps. It is a pure function of `(state, limits, steps)`: no side effects
//! beyond the state itself, and identical inputs always produce identical
//! outputs. That determinism is the basis for replay-based lag compensation:
//! the authoritative physics is reproduced here step for step, so the local
//! estimate and the remote truth stay consistent between snapshots.
//!
//! # Step order
//!
//! For each 1 ms step, in order:
//!
//! 1. `heading += rotation * rotation_speed`
//! 2. if thrusting: `velocity += (cos(heading), sin(heading)) * thrust_acceleration`
//! 3. clamp `|velocity|` to `max_speed`
//! 4. `position += velocity`

use crate::kinematics::{EntityLimits, KinematicState, Millis};
use crate::math::Vec2;
use crate::profiles::{MotionModel, MotionProfile};

/// Advance a powered entity by `steps` 1 ms increments.
///
/// `steps = 0` is a no-op. A negative `steps` is a programming error in the
/// caller: it panics in debug builds and clamps to 0 in release builds
/// (never simulates backward).
pub fn advance(state: &mut KinematicState, limits: &EntityLimits, steps: i64) {
    debug_assert!(steps >= 0, "negative step count: {steps}");

    for _ in 0..steps.max(0) {
        state.heading += state.rotation.factor() * limits.rotation_speed;

        if state.thrust_active {
            state.velocity += Vec2::from_angle(state.heading) * limits.thrust_acceleration;
        }

        state.limit_speed(limits.max_speed);

        state.position += state.velocity;
    }
}

/// Advance a ballistic entity by `steps` 1 ms increments.
///
/// Ballistic objects carry no forces: velocity never changes after launch,
/// so each step is pure position integration. Same `steps` contract as
/// [`advance`].
pub fn advance_ballistic(state: &mut KinematicState, steps: i64) {
    debug_assert!(steps >= 0, "negative step count: {steps}");

    for _ in 0..steps.max(0) {
        state.position += state.velocity;
    }
}

/// Advance an entity from its `last_update` to `now` under its profile.
///
/// The elapsed duration is clamped to zero if `now` is earlier than the
/// state's `last_update` (local and remote clocks can disagree); the state
/// is then stamped so it is never advanced over the same interval twice.
/// Fractional milliseconds do not exist at this layer: timestamps are whole
/// milliseconds, which bounds worst-case catch-up cost per update.
pub fn advance_to(state: &mut KinematicState, profile: &MotionProfile, now: Millis) {
    let elapsed = (now - state.last_update).max(0);

    match profile.model {
        MotionModel::Powered => advance(state, &profile.limits, elapsed),
        MotionModel::Ballistic => advance_ballistic(state, elapsed),
    }

    state.last_update = state.last_update.max(now);
}
