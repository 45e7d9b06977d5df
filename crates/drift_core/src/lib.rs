//! # Drift Core
//!
//! Deterministic client-side motion extrapolation for networked games.
//!
//! Given periodic, lossy, latency-affected kinematic snapshots from an
//! authoritative source, this crate locally simulates smooth, physically
//! plausible motion for remote entities between updates. It does this by
//! dead reckoning: the authoritative physics step is reproduced client-side,
//! step for step, so the two simulations stay consistent.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No network transport (decoded events are handed in by the caller)
//! - No system randomness
//! - No file IO in the simulation path
//!
//! This separation enables:
//! - Replay-based lag compensation (same inputs, same outputs)
//! - Headless verification builds
//! - Event-stream recording and playback
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`kinematics`] - Per-entity kinematic state and tuning limits
//! - [`integrator`] - Fixed-step motion integration
//! - [`compensator`] - Snapshot extrapolation to present time
//! - [`receiver`] - Transport boundary: validation and event inbox
//! - [`session`] - Entity registry and per-frame tick loop
//! - [`profiles`] - Data-driven per-class motion tuning
//! - [`recording`] - Event-stream capture and deterministic playback

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod compensator;
pub mod error;
pub mod integrator;
pub mod kinematics;
pub mod math;
pub mod profiles;
pub mod receiver;
pub mod recording;
pub mod session;

#[cfg(test)]
mod test_support;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::compensator::{extrapolate, Snapshot};
    pub use crate::error::{MotionError, Result};
    pub use crate::kinematics::{
        ControlIntent, EntityId, EntityLimits, KinematicState, Millis, RotationDir,
    };
    pub use crate::math::Vec2;
    pub use crate::profiles::{MotionModel, MotionProfile, ProfileData, ProfileRegistry};
    pub use crate::receiver::{ControlUpdate, EventInbox, RawSnapshot, TransportEvent};
    pub use crate::session::{Session, TickEvents};
}
