//! Snapshot extrapolation to present time.
//!
//! A [`Snapshot`] describes an entity's kinematic state as of some past
//! instant on the authoritative clock. By the time it arrives, the entity
//! has kept moving under the same control inputs; the compensator replays
//! the integrator over the elapsed interval to estimate where the entity is
//! *now*. This is dead reckoning, not position interpolation: it reproduces
//! the authoritative physics step for step rather than blending between
//! stale positions.

use serde::{Deserialize, Serialize};

use crate::integrator;
use crate::kinematics::{EntityId, KinematicState, Millis, RotationDir};
use crate::math::Vec2;
use crate::profiles::MotionProfile;

/// Authoritative, timestamped description of an entity's kinematic state.
///
/// Created on receipt, consumed immediately by extrapolation, not retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Entity the update applies to.
    pub entity_id: EntityId,
    /// Position at `server_timestamp`.
    pub position: Vec2,
    /// Velocity at `server_timestamp`, in units per millisecond.
    pub velocity: Vec2,
    /// Heading at `server_timestamp`, in radians.
    pub heading: f32,
    /// Whether the thruster was engaged.
    pub thrust_active: bool,
    /// Turn direction in effect.
    pub rotation: RotationDir,
    /// Authoritative clock time the state describes.
    pub server_timestamp: Millis,
}

impl Snapshot {
    /// Seed a kinematic state from this snapshot, stamped at the snapshot's
    /// own send time.
    #[must_use]
    pub fn seed(&self) -> KinematicState {
        KinematicState {
            position: self.position,
            velocity: self.velocity,
            heading: self.heading,
            rotation: self.rotation,
            thrust_active: self.thrust_active,
            last_update: self.server_timestamp,
        }
    }
}

/// Reconstruct a plausible current state from a snapshot.
///
/// Seeds a state from the snapshot and replays the integrator for
/// `max(0, now - server_timestamp)` whole milliseconds. If the clocks
/// disagree such that the snapshot appears to come from the future, the
/// elapsed time clamps to zero: the seeded state is returned as-is and is
/// never simulated backward.
#[must_use]
pub fn extrapolate(snapshot: &Snapshot, profile: &MotionProfile, now: Millis) -> KinematicState {
    let mut state = snapshot.seed();
    integrator::advance_to(&mut state, profile, now);
    state
}
